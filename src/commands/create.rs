//! Create command handler

use anyhow::Result;

use gmachine::gcloud::{self, CreateRequest};
use gmachine::{ConfigPath, CsekBundle, GmachineError, MachineRecord, Registry};

/// Options collected from the `create` subcommand flags.
pub struct CreateOpts {
    pub name: String,
    pub project: String,
    pub zone: String,
    pub machine_type: String,
    pub disk_size: String,
    pub disk_type: String,
    pub image_project: String,
    pub image_family: String,
    pub csek: bool,
    pub preemptible: bool,
    pub no_service_account: bool,
    pub service_account: Option<String>,
    pub disable_ssh_project_keys: bool,
    pub set_default: bool,
}

/// Create the instance with the provider, then register it. The registry is
/// checked up front so a clash fails before any provider work happens.
pub fn cmd_create(config: &ConfigPath, opts: CreateOpts) -> Result<()> {
    let registry = Registry::load(&config.path)?;

    if registry.exists(&opts.name) {
        return Err(GmachineError::AlreadyExists { name: opts.name }.into());
    }

    let account = gcloud::current_account()?;

    let csek = if opts.csek {
        CsekBundle::generate(&gcloud::disk_uri(&opts.project, &opts.zone, &opts.name))
    } else {
        CsekBundle::default()
    };

    let service_account = opts.service_account.unwrap_or_default();

    let mut request = CreateRequest {
        name: opts.name.clone(),
        account: account.clone(),
        project: opts.project.clone(),
        zone: opts.zone.clone(),
        machine_type: opts.machine_type,
        boot_disk_size: opts.disk_size,
        boot_disk_type: opts.disk_type,
        image_project: opts.image_project,
        image_family: opts.image_family,
        preemptible: opts.preemptible,
        csek: csek.clone(),
        service_account: service_account.clone(),
        no_service_account: opts.no_service_account,
        ..Default::default()
    };
    if opts.disable_ssh_project_keys {
        request.add_metadata("block-project-ssh-keys", "true");
    }

    println!("Creating...");
    gcloud::create_instance(&request)?;

    registry.add(MachineRecord {
        name: opts.name.clone(),
        account,
        project: opts.project,
        zone: opts.zone,
        csek,
        default_ssh_args: String::new(),
        service_account,
    })?;

    if opts.set_default {
        registry.set_default(&opts.name)?;
    }

    println!("Success");
    Ok(())
}
