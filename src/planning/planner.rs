use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Local;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::PlanError,
    media::MediaFile,
    planning::types::{InferenceParams, JobSpec, UsedVideoSet},
};

/// Range per-job seeds are drawn from when no global seed is configured
const JOB_SEED_RANGE: std::ops::RangeInclusive<u64> = 1..=999_999;

/// Timestamp format embedded in output file names
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Decides which (audio, video) pairs a run will process
///
/// Every audio file is used at most once. Videos are picked uniformly at
/// random, either independently for each job or, when repeats are disabled,
/// without replacement until the pool is exhausted, at which point a new
/// cycle starts.
pub struct JobPlanner {
    rng: StdRng,
    fixed_seed: Option<u64>,
    max_combinations: Option<usize>,
    allow_repeat_videos: bool,
    params: InferenceParams,
    output_dir: PathBuf,
    used_videos: UsedVideoSet,
    planned_outputs: HashSet<PathBuf>,
}

impl JobPlanner {
    /// Create a planner with default model parameters writing into `output_dir`
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            fixed_seed: None,
            max_combinations: None,
            allow_repeat_videos: true,
            params: InferenceParams::default(),
            output_dir: output_dir.into(),
            used_videos: UsedVideoSet::new(),
            planned_outputs: HashSet::new(),
        }
    }

    /// Create a planner from the batch, model and output settings of a config
    pub fn from_config(config: &Config) -> Self {
        let mut planner = Self::new(config.inputs.output_dir.clone())
            .with_params(InferenceParams::from(&config.model))
            .with_max_combinations(config.batch.max_combinations)
            .with_repeat_videos(config.batch.allow_repeat_videos);

        if let Some(seed) = config.batch.random_seed {
            planner = planner.with_seed(seed);
        }

        planner
    }

    /// Seed the sampling RNG and pin every job's seed to `seed`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.fixed_seed = Some(seed);
        self
    }

    /// Cap the number of jobs. `Some(0)` behaves like no cap.
    pub fn with_max_combinations(mut self, max: Option<usize>) -> Self {
        self.max_combinations = max.filter(|&max| max > 0);
        self
    }

    pub fn with_repeat_videos(mut self, allow: bool) -> Self {
        self.allow_repeat_videos = allow;
        self
    }

    pub fn with_params(mut self, params: InferenceParams) -> Self {
        self.params = params;
        self
    }

    /// Videos picked so far in the current no-repeat cycle
    pub fn used_videos(&self) -> &UsedVideoSet {
        &self.used_videos
    }

    /// Plan one job per selected audio file
    ///
    /// Fails without producing any jobs when either list is empty.
    pub fn plan(
        &mut self,
        audio_files: &[MediaFile],
        video_files: &[MediaFile],
    ) -> std::result::Result<Vec<JobSpec>, PlanError> {
        if video_files.is_empty() {
            return Err(PlanError::NoVideoFiles);
        }
        if audio_files.is_empty() {
            return Err(PlanError::NoAudioFiles);
        }

        let selected_audio = self.select_audio(audio_files);
        debug!("Selected {} of {} audio files", selected_audio.len(), audio_files.len());

        let mut jobs = Vec::with_capacity(selected_audio.len());
        for (index, audio) in selected_audio.into_iter().enumerate() {
            let video = self.select_video(video_files);
            let seed = self.job_seed();
            let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            let output_path = self.unique_output_path(&video, &audio, &timestamp);

            debug!("Planned job {}: {} + {} -> {:?} (seed {})",
                   index + 1, audio.file_name(), video.file_name(), output_path, seed);

            jobs.push(JobSpec {
                ordinal: index + 1,
                audio,
                video,
                params: self.params.clone(),
                seed,
                output_path,
            });
        }

        Ok(jobs)
    }

    /// Apply the job cap by uniform sampling without replacement
    fn select_audio(&mut self, audio_files: &[MediaFile]) -> Vec<MediaFile> {
        match self.max_combinations {
            Some(max) if max < audio_files.len() => {
                rand::seq::index::sample(&mut self.rng, audio_files.len(), max)
                    .into_iter()
                    .map(|i| audio_files[i].clone())
                    .collect()
            }
            _ => audio_files.to_vec(),
        }
    }

    fn select_video(&mut self, video_files: &[MediaFile]) -> MediaFile {
        if self.allow_repeat_videos {
            return video_files[self.rng.gen_range(0..video_files.len())].clone();
        }

        if self.used_videos.is_exhausted(video_files.len()) {
            warn!("All videos have been used. Reusing videos.");
            self.used_videos.clear();
        }

        let mut available: Vec<&MediaFile> = video_files
            .iter()
            .filter(|video| !self.used_videos.contains(video.path()))
            .collect();

        if available.is_empty() {
            warn!("No more unique videos available. Reusing videos.");
            self.used_videos.clear();
            available = video_files.iter().collect();
        }

        let video = available[self.rng.gen_range(0..available.len())].clone();
        self.used_videos.insert(video.path());
        video
    }

    fn job_seed(&mut self) -> u64 {
        match self.fixed_seed {
            Some(seed) => seed,
            None => self.rng.gen_range(JOB_SEED_RANGE),
        }
    }

    /// `{video_stem}_{audio_stem}_{timestamp}.mp4`, suffixed with `_N` when
    /// that name was already planned in this run or exists on disk.
    fn unique_output_path(&mut self, video: &MediaFile, audio: &MediaFile, timestamp: &str) -> PathBuf {
        let base = format!("{}_{}_{}", video.stem(), audio.stem(), timestamp);
        let mut candidate = self.output_dir.join(format!("{}.mp4", base));
        let mut suffix = 2;

        while self.is_taken(&candidate) {
            candidate = self.output_dir.join(format!("{}_{}.mp4", base, suffix));
            suffix += 1;
        }

        self.planned_outputs.insert(candidate.clone());
        candidate
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.planned_outputs.contains(path) || path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use tempfile::tempdir;

    fn media(names: &[&str]) -> Vec<MediaFile> {
        names.iter().map(|name| MediaFile::new(*name)).collect()
    }

    fn shuffled(files: &[MediaFile], seed: u64) -> Vec<MediaFile> {
        let mut files = files.to_vec();
        files.shuffle(&mut StdRng::seed_from_u64(seed));
        files
    }

    #[test]
    fn test_empty_inputs_fail_fast() {
        let mut planner = JobPlanner::new("out");
        let audio = media(&["x.wav"]);
        let video = media(&["a.mp4"]);

        assert_eq!(planner.plan(&audio, &[]), Err(PlanError::NoVideoFiles));
        assert_eq!(planner.plan(&[], &video), Err(PlanError::NoAudioFiles));
    }

    #[test]
    fn test_one_job_per_audio_file() {
        let audio = media(&["x.wav", "y.wav"]);
        let video = media(&["a.mp4", "b.mp4"]);
        let mut planner = JobPlanner::new("out");

        let jobs = planner.plan(&audio, &video).unwrap();
        assert_eq!(jobs.len(), 2);

        let used_audio: Vec<&MediaFile> = jobs.iter().map(|job| &job.audio).collect();
        assert_eq!(used_audio, vec![&audio[0], &audio[1]]);
        for (i, job) in jobs.iter().enumerate() {
            assert_eq!(job.ordinal, i + 1);
            assert!(video.contains(&job.video));
        }
    }

    #[test]
    fn test_cap_samples_without_replacement() {
        let audio = media(&["a.wav", "b.wav", "c.wav", "d.wav", "e.wav"]);
        let video = media(&["v.mp4"]);

        for seed in 0..20 {
            let mut planner = JobPlanner::new("out")
                .with_seed(seed)
                .with_max_combinations(Some(3));
            let jobs = planner.plan(&audio, &video).unwrap();

            assert_eq!(jobs.len(), 3);
            let distinct: HashSet<&MediaFile> = jobs.iter().map(|job| &job.audio).collect();
            assert_eq!(distinct.len(), 3);
            assert!(jobs.iter().all(|job| audio.contains(&job.audio)));
        }
    }

    #[test]
    fn test_cap_larger_than_audio_list() {
        let audio = media(&["a.wav", "b.wav"]);
        let video = media(&["v.mp4"]);
        let mut planner = JobPlanner::new("out").with_max_combinations(Some(10));

        let jobs = planner.plan(&audio, &video).unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn test_zero_cap_means_unlimited() {
        let audio = media(&["a.wav", "b.wav", "c.wav"]);
        let video = media(&["v.mp4"]);
        let mut planner = JobPlanner::new("out").with_max_combinations(Some(0));

        assert_eq!(planner.plan(&audio, &video).unwrap().len(), 3);
    }

    #[test]
    fn test_single_cap_picks_any_audio() {
        let audio = media(&["a.wav", "b.wav", "c.wav"]);
        let video = media(&["v.mp4"]);
        let mut seen = HashSet::new();

        for seed in 0..200 {
            let mut planner = JobPlanner::new("out")
                .with_seed(seed)
                .with_max_combinations(Some(1));
            let jobs = planner.plan(&audio, &video).unwrap();
            assert_eq!(jobs.len(), 1);
            seen.insert(jobs[0].audio.clone());
        }

        assert_eq!(seen.len(), 3, "every audio file should be reachable");
    }

    #[test]
    fn test_no_repeat_cycles_through_pool() {
        let audio: Vec<MediaFile> = (0..7).map(|i| MediaFile::new(format!("t{}.wav", i))).collect();
        let video = media(&["a.mp4", "b.mp4", "c.mp4"]);
        let mut planner = JobPlanner::new("out")
            .with_seed(7)
            .with_repeat_videos(false);

        let jobs = planner.plan(&audio, &video).unwrap();
        assert_eq!(jobs.len(), 7);

        for cycle in jobs.chunks(3) {
            let distinct: HashSet<&MediaFile> = cycle.iter().map(|job| &job.video).collect();
            assert_eq!(distinct.len(), cycle.len(), "no video repeats within a cycle");
        }

        // The seventh pick opened a fresh cycle
        assert_eq!(planner.used_videos().len(), 1);
    }

    #[test]
    fn test_no_repeat_resets_after_pool_exhausted() {
        let audio = media(&["x.wav", "y.wav"]);
        let video = media(&["a.mp4", "b.mp4"]);
        let mut planner = JobPlanner::new("out").with_repeat_videos(false);

        planner.plan(&audio, &video).unwrap();
        assert!(planner.used_videos().is_exhausted(video.len()));

        planner.plan(&media(&["z.wav"]), &video).unwrap();
        assert_eq!(planner.used_videos().len(), 1);
    }

    #[test]
    fn test_seeded_plans_are_reproducible() {
        let audio = shuffled(&media(&["a.wav", "b.wav", "c.wav", "d.wav"]), 3);
        let video = media(&["p.mp4", "q.mp4", "r.mp4"]);

        let plan = |seed| {
            JobPlanner::new("out")
                .with_seed(seed)
                .with_max_combinations(Some(3))
                .plan(&audio, &video)
                .unwrap()
                .into_iter()
                .map(|job| (job.audio, job.video, job.seed))
                .collect::<Vec<_>>()
        };

        assert_eq!(plan(99), plan(99));
    }

    #[test]
    fn test_job_seed_policy() {
        let audio = media(&["a.wav", "b.wav", "c.wav"]);
        let video = media(&["v.mp4"]);

        let jobs = JobPlanner::new("out").with_seed(1234).plan(&audio, &video).unwrap();
        assert!(jobs.iter().all(|job| job.seed == 1234));

        let jobs = JobPlanner::new("out").plan(&audio, &video).unwrap();
        assert!(jobs.iter().all(|job| JOB_SEED_RANGE.contains(&job.seed)));
    }

    #[test]
    fn test_output_naming() {
        let audio = media(&["audio/line_01.wav"]);
        let video = media(&["video/host.mp4"]);
        let mut planner = JobPlanner::new("output/lipsync");

        let job = planner.plan(&audio, &video).unwrap().remove(0);
        assert_eq!(job.output_path.parent(), Some(Path::new("output/lipsync")));

        let name = job.output_name();
        assert!(name.starts_with("host_line_01_"));
        assert!(name.ends_with(".mp4"));
        // host_line_01_ + YYYYMMDD_HHMMSS + .mp4
        assert_eq!(name.len(), "host_line_01_".len() + 15 + 4);
    }

    #[test]
    fn test_output_names_unique_for_identical_stems() {
        let audio = media(&["one/x.wav", "two/x.wav", "three/x.wav"]);
        let video = media(&["a.mp4"]);
        let mut planner = JobPlanner::new("out");

        let jobs = planner.plan(&audio, &video).unwrap();
        let outputs: HashSet<&PathBuf> = jobs.iter().map(|job| &job.output_path).collect();
        assert_eq!(outputs.len(), 3);
    }

    #[test]
    fn test_existing_output_file_is_not_reused() {
        let dir = tempdir().unwrap();
        let mut planner = JobPlanner::new(dir.path());
        let video = MediaFile::new("a.mp4");
        let audio = MediaFile::new("x.wav");

        std::fs::write(dir.path().join("a_x_20240101_000000.mp4"), b"").unwrap();
        let path = planner.unique_output_path(&video, &audio, "20240101_000000");
        assert_eq!(path, dir.path().join("a_x_20240101_000000_2.mp4"));

        let next = planner.unique_output_path(&video, &audio, "20240101_000000");
        assert_eq!(next, dir.path().join("a_x_20240101_000000_3.mp4"));
    }
}
