use forkboot_core::{WorkerCommand, WorkerInvocation};

pub fn print_command_breakdown(command: &WorkerCommand, invocation: &WorkerInvocation) {
    println!("   🔧 Worker command:");
    println!("      • fork: {}", invocation.fork_number);
    println!("      • config: {}", invocation.config_path.display());
    if let Some(pid) = invocation.plugin_pid {
        println!("      • watching pid: {}", pid);
    }
    if let Some(dir) = command.working_dir() {
        println!("      • working dir: {}", dir.display());
    }
    println!("   {}", command.to_shell_command(invocation));
}
