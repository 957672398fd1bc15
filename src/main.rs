use clap::Parser;
use log::debug;

use depmeta::{
    cli::{
        args::{CliArgs, Command},
        command_handlers::{do_compare, do_inspect, do_sort},
    },
    DependencyManagementServices, DepmetaConfig,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli_args: CliArgs = CliArgs::parse();
    debug!("Parsed arguments {:?}", cli_args);

    let mut config = DepmetaConfig::load()?;
    if !cli_args.qualifiers.is_empty() {
        config.version_qualifiers = Some(cli_args.qualifiers);
    }
    debug!("Loaded configuration {:?}", config);
    let services = DependencyManagementServices::from_config(&config);

    let out = match cli_args.cmd {
        Command::Inspect {
            file,
            configuration,
        } => do_inspect(&services, &file, configuration.as_deref())?,
        Command::Compare { left, right } => do_compare(&services, &left, &right)?,
        Command::Sort { versions } => do_sort(&services, &versions)?,
    };
    print!("{out}");
    Ok(())
}
