mod worker_command;

pub use worker_command::{WorkerCommand, WorkerExit, WorkerInvocation, WorkerSpawner};
