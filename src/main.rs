//! pulsewatch-agent entrypoint: parse arguments, bootstrap, run until
//! interrupted. All logic lives in the library; this only maps errors to
//! process exit codes.

use clap::Parser;
use pulsewatch::{Agent, AgentError};
use pulsewatch_config::{load_check_configs, AgentArgs, AgentConfig};

fn main() {
    let args = AgentArgs::parse();

    if let Err(e) = run(args) {
        eprintln!("pulsewatch-agent: {e}");
        let code = e.downcast_ref::<AgentError>().map_or(1, AgentError::exit_code);
        std::process::exit(code);
    }
}

fn run(args: AgentArgs) -> anyhow::Result<()> {
    let config = AgentConfig::resolve(&args).map_err(AgentError::from)?;

    pulsewatch_utils::logging::init_tracing(&config.log_level)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    std::fs::create_dir_all(&config.data_directory).map_err(|source| AgentError::DataDirectory {
        path: config.data_directory.clone(),
        source,
    })?;

    let lock_path = config.data_directory.join("agent.lock");
    let lock = pulsewatch_lock::AgentLock::acquire(&lock_path).map_err(AgentError::from)?;

    let hostname = pulsewatch::hostname::resolve_hostname(config.node_name.as_deref());
    tracing::info!(hostname = %hostname, data_dir = %config.data_directory.display(), "starting pulsewatch agent");

    let check_config = load_check_configs(&config.check_config_path);
    let mut agent = Agent::bootstrap(config.clone(), hostname, check_config);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let result = runtime.block_on(agent.run(&config.data_directory));

    lock.release().map_err(AgentError::from)?;
    result
}
