use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::{config::ToolConfig, planning::JobSpec};

/// Fully resolved command line for one job
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceCommand {
    program: String,
    args: Vec<OsString>,
    working_dir: Option<PathBuf>,
}

impl InferenceCommand {
    /// Build the invocation for `job` using the configured tool
    pub fn for_job(tool: &ToolConfig, job: &JobSpec) -> Self {
        let params = &job.params;
        let relocated = tool.working_dir.is_some();
        let mut args: Vec<OsString> = tool.args.iter().map(OsString::from).collect();

        let mut flag = |name: &str, value: OsString| {
            args.push(OsString::from(name));
            args.push(value);
        };

        flag("--unet_config_path", params.config_path.clone().into_os_string());
        flag("--inference_ckpt_path", params.ckpt_path.clone().into_os_string());
        flag("--video_path", media_arg(job.video.path(), relocated));
        flag("--audio_path", media_arg(job.audio.path(), relocated));
        flag("--video_out_path", media_arg(&job.output_path, relocated));
        flag("--inference_steps", params.inference_steps.to_string().into());
        flag("--guidance_scale", params.guidance_scale.to_string().into());
        flag("--seed", job.seed.to_string().into());

        if params.enable_deepcache {
            args.push(OsString::from("--enable_deepcache"));
        }

        Self {
            program: tool.program.clone(),
            args,
            working_dir: tool.working_dir.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Space-joined command line for logging
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Process handle with stdout/stderr captured and stdin closed
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

/// Media paths were discovered relative to our own directory; when the tool
/// runs elsewhere they must be absolute to point at the same files.
fn media_arg(path: &Path, relocated: bool) -> OsString {
    if relocated && path.is_relative() {
        std::path::absolute(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .into_os_string()
    } else {
        path.as_os_str().to_owned()
    }
}
