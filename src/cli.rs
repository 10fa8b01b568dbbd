use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gmachine - manage personal cloud compute machines
#[derive(Parser, Debug)]
#[command(name = "gmachine")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "The registry file location can be overridden with --config or GMACHINE_CONFIG.")]
pub struct Cli {
    /// Registry file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current status of one machine, or all with --all
    Status {
        /// Machine name (defaults to the default machine)
        name: Option<String>,

        /// Print status of all registered machines
        #[arg(short, long, conflicts_with = "name")]
        all: bool,
    },

    /// List all machines in the registry
    List,

    /// Create a cloud machine and register it
    Create {
        /// Machine name
        name: String,

        /// The cloud project to create the instance in
        #[arg(short, long)]
        project: String,

        /// The zone to create the instance in
        #[arg(short, long)]
        zone: String,

        /// Machine type for the instance
        #[arg(long, default_value = "f1-micro")]
        machine_type: String,

        /// Size of the boot disk. Valid units: KB, MB, GB, TB
        #[arg(long, default_value = "10GB")]
        disk_size: String,

        /// Type of the boot disk
        #[arg(long, default_value = "pd-standard")]
        disk_type: String,

        /// Project against which image and image family are resolved
        #[arg(long, default_value = "ubuntu-os-cloud")]
        image_project: String,

        /// Image family the boot disk is initialized with
        #[arg(long, default_value = "ubuntu-2204-lts")]
        image_family: String,

        /// Encrypt the boot disk with a customer-supplied encryption key.
        /// The key is generated and stored in the registry file
        #[arg(long)]
        csek: bool,

        /// Create a preemptible instance
        #[arg(long)]
        preemptible: bool,

        /// Create the instance without a service account
        #[arg(long, conflicts_with = "service_account")]
        no_service_account: bool,

        /// Service account email to associate with the instance
        #[arg(long)]
        service_account: Option<String>,

        /// Disable automatically adding project SSH key users to the instance
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        disable_ssh_project_keys: bool,

        /// Set this machine as the default (the first machine always is)
        #[arg(long)]
        set_default: bool,
    },

    /// Delete a cloud machine and remove it from the registry
    Delete {
        /// Machine name
        name: String,

        /// Remove from the registry even if the provider delete fails
        #[arg(short, long)]
        force: bool,
    },

    /// Start a stopped machine
    Start {
        /// Machine name (defaults to the default machine)
        name: Option<String>,
    },

    /// Stop a running machine
    Stop {
        /// Machine name (defaults to the default machine)
        name: Option<String>,
    },

    /// Suspend a running machine
    Suspend {
        /// Machine name (defaults to the default machine)
        name: Option<String>,
    },

    /// Resume a suspended machine
    Resume {
        /// Machine name (defaults to the default machine)
        name: Option<String>,
    },

    /// Spawn 'gcloud compute ssh' to connect to a machine
    Ssh {
        /// Machine name (defaults to the default machine)
        name: Option<String>,

        /// Additional ssh args (example '-A -C'). Overrides
        /// default_ssh_args from the registry file
        #[arg(long, allow_hyphen_values = true)]
        ssh_args: Option<String>,

        /// Enable SSH agent forwarding
        #[arg(short = 'A', long)]
        agent_forward: bool,
    },

    /// Resize a machine to a different machine type
    Resize {
        /// Machine name
        name: String,

        /// Machine type to resize to
        #[arg(short = 't', long = "type")]
        machine_type: String,
    },

    /// Print a machine's public IP if it is RUNNING
    PrintIp {
        /// Machine name (defaults to the default machine)
        name: Option<String>,
    },

    /// Open the cloud console page for a machine
    Console {
        /// Machine name (defaults to the default machine)
        name: Option<String>,

        /// The 'authuser=' var to add to the console URL
        #[arg(short = 'u', long)]
        authuser: Option<String>,
    },

    /// Set the default machine used when no name is given
    SetDefault {
        /// Machine name (empty string clears the default)
        name: String,
    },

    /// Print the name of the default machine, if set
    GetDefault,

    /// Show version information
    Version,
}
