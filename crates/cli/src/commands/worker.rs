use forkboot_core::{BootedConfiguration, EngineReport, TestEngine, WorkerArgs, run_worker};
use std::path::PathBuf;
use tracing::error;

use crate::display::print_configuration;

/// Engine that prints the decoded plan instead of running tests. Every
/// selected test pattern counts as one planned test.
#[derive(Debug, Default)]
pub struct SummaryEngine;

impl TestEngine for SummaryEngine {
    fn execute(&mut self, config: &BootedConfiguration) -> anyhow::Result<EngineReport> {
        print_configuration(config);

        let scan = config.provider.directory_scan();
        let planned = config.provider.test_request().test_list_resolver().patterns().len()
            + scan.specific_tests().len()
            + scan.includes().len();
        println!("🧪 Planned selections: {}", planned);

        Ok(EngineReport {
            tests_run: u32::try_from(planned)?,
            ..Default::default()
        })
    }
}

pub fn worker_command(file: PathBuf, pid: Option<String>) -> i32 {
    let raw_args = std::iter::once(file.into_os_string()).chain(pid.map(Into::into));
    let args = match WorkerArgs::from_args(raw_args) {
        Ok(args) => args,
        Err(e) => {
            error!("Invalid worker arguments: {}", e);
            return e.exit_code();
        }
    };
    run_worker(&args, &mut SummaryEngine)
}
