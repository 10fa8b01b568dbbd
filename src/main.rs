//! gmachine CLI - manage personal cloud compute machines
//!
//! Thin binary layer: parse arguments, resolve the registry path, and
//! dispatch to a command handler. All real logic lives in the library.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use gmachine::ConfigPath;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigPath::resolve(cli.config);

    match cli.command {
        Commands::Status { name, all } => commands::status::cmd_status(&config, name, all),
        Commands::List => commands::list::cmd_list(&config),
        Commands::Create {
            name,
            project,
            zone,
            machine_type,
            disk_size,
            disk_type,
            image_project,
            image_family,
            csek,
            preemptible,
            no_service_account,
            service_account,
            disable_ssh_project_keys,
            set_default,
        } => commands::create::cmd_create(
            &config,
            commands::create::CreateOpts {
                name,
                project,
                zone,
                machine_type,
                disk_size,
                disk_type,
                image_project,
                image_family,
                csek,
                preemptible,
                no_service_account,
                service_account,
                disable_ssh_project_keys,
                set_default,
            },
        ),
        Commands::Delete { name, force } => commands::delete::cmd_delete(&config, &name, force),
        Commands::Start { name } => commands::power::cmd_start(&config, name),
        Commands::Stop { name } => commands::power::cmd_stop(&config, name),
        Commands::Suspend { name } => commands::power::cmd_suspend(&config, name),
        Commands::Resume { name } => commands::power::cmd_resume(&config, name),
        Commands::Ssh {
            name,
            ssh_args,
            agent_forward,
        } => commands::ssh::cmd_ssh(&config, name, ssh_args, agent_forward),
        Commands::Resize { name, machine_type } => {
            commands::resize::cmd_resize(&config, &name, &machine_type)
        }
        Commands::PrintIp { name } => commands::print_ip::cmd_print_ip(&config, name),
        Commands::Console { name, authuser } => {
            commands::console::cmd_console(&config, name, authuser)
        }
        Commands::SetDefault { name } => commands::defaults::cmd_set_default(&config, &name),
        Commands::GetDefault => commands::defaults::cmd_get_default(&config),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
