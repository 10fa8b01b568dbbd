//! External provider glue: argument assembly and process spawning for the
//! `gcloud` CLI, plus the `Describer` seam the status aggregator consumes.
//!
//! Nothing here talks to the provider API directly; every operation is a
//! fixed command-line invocation of the external tool. Argument assembly is
//! kept in pure functions so it can be tested without spawning anything.

use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::{GmachineError, GmachineResult};
use crate::models::CsekBundle;

/// Live state for one instance, as reported by `describe --format=json`.
///
/// Only the fields the status table needs are modeled; everything else in
/// the provider's JSON is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub zone: String,
    pub machine_type: String,
    pub status: String,
    pub scheduling: Scheduling,
    pub network_interfaces: Vec<NetworkInterface>,
    pub service_accounts: Vec<ServiceAccount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scheduling {
    pub preemptible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    #[serde(rename = "networkIP")]
    pub network_ip: String,
    pub access_configs: Vec<AccessConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessConfig {
    #[serde(rename = "natIP")]
    pub nat_ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceAccount {
    pub email: String,
}

/// Anything capable of returning live state for one machine given its
/// identity. Production code uses [`GcloudDescriber`]; tests substitute an
/// instrumented fake.
pub trait Describer: Sync {
    fn describe(
        &self,
        name: &str,
        account: &str,
        project: &str,
        zone: &str,
    ) -> GmachineResult<Instance>;
}

/// Describer that shells out to `gcloud compute instances describe`.
pub struct GcloudDescriber;

impl Describer for GcloudDescriber {
    fn describe(
        &self,
        name: &str,
        account: &str,
        project: &str,
        zone: &str,
    ) -> GmachineResult<Instance> {
        let args = describe_args(name, account, project, zone);
        let bytes = output(&args).map_err(|e| GmachineError::Describe {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| GmachineError::Describe {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

fn describe_args(name: &str, account: &str, project: &str, zone: &str) -> Vec<String> {
    vec![
        "gcloud".into(),
        "beta".into(),
        "compute".into(),
        "instances".into(),
        "describe".into(),
        name.into(),
        format!("--account={account}"),
        format!("--project={project}"),
        format!("--zone={zone}"),
        "--format=json".into(),
    ]
}

/// Configuration for creating a new instance with [`create_instance`].
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub name: String,
    pub account: String,
    pub project: String,
    pub zone: String,
    pub machine_type: String,
    pub boot_disk_size: String,
    pub boot_disk_type: String,
    pub image_project: String,
    pub image_family: String,
    pub preemptible: bool,
    pub metadata: BTreeMap<String, String>,
    pub csek: CsekBundle,
    pub service_account: String,
    pub no_service_account: bool,
}

impl CreateRequest {
    /// Add a key=value pair to the instance's metadata.
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }
}

fn create_args(req: &CreateRequest) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "gcloud".into(),
        "beta".into(),
        "compute".into(),
        "instances".into(),
        "create".into(),
        req.name.clone(),
        format!("--account={}", req.account),
        format!("--project={}", req.project),
        format!("--zone={}", req.zone),
        format!("--machine-type={}", req.machine_type),
        format!("--boot-disk-size={}", req.boot_disk_size),
        format!("--boot-disk-type={}", req.boot_disk_type),
        format!("--image-project={}", req.image_project),
        format!("--image-family={}", req.image_family),
    ];

    if req.preemptible {
        args.push("--preemptible".into());
    }
    if !req.no_service_account && !req.service_account.is_empty() {
        args.push(format!("--service-account={}", req.service_account));
    }
    if req.no_service_account {
        args.push("--no-service-account".into());
        args.push("--no-scopes".into());
    }

    if !req.metadata.is_empty() {
        let pairs: Vec<String> = req
            .metadata
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        args.push(format!("--metadata={}", pairs.join(",")));
    }

    if !req.csek.is_empty() {
        args.push("--csek-key-file=-".into());
    }

    args
}

/// Create a new instance. The CSEK bundle, when present, is marshaled to
/// JSON and fed to gcloud on stdin.
pub fn create_instance(req: &CreateRequest) -> GmachineResult<()> {
    let stdin = if req.csek.is_empty() {
        None
    } else {
        Some(req.csek.to_json()?)
    };
    run(stdin, &create_args(req))
}

pub fn delete_instance(name: &str, account: &str, project: &str, zone: &str) -> GmachineResult<()> {
    run(
        None,
        &[
            "gcloud".into(),
            "compute".into(),
            "instances".into(),
            "delete".into(),
            name.into(),
            format!("--account={account}"),
            format!("--project={project}"),
            format!("--zone={zone}"),
            "-q".into(),
        ],
    )
}

fn lifecycle_args(
    verb: &str,
    name: &str,
    account: &str,
    project: &str,
    zone: &str,
    csek: &CsekBundle,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "gcloud".into(),
        "beta".into(),
        "compute".into(),
        "instances".into(),
        verb.into(),
        name.into(),
        format!("--account={account}"),
        format!("--project={project}"),
        format!("--zone={zone}"),
    ];
    if !csek.is_empty() {
        args.push("--csek-key-file=-".into());
    }
    args
}

/// Start a stopped instance, feeding the CSEK bundle on stdin when present.
pub fn start_instance(
    name: &str,
    account: &str,
    project: &str,
    zone: &str,
    csek: &CsekBundle,
) -> GmachineResult<()> {
    let stdin = if csek.is_empty() {
        None
    } else {
        Some(csek.to_json()?)
    };
    run(stdin, &lifecycle_args("start", name, account, project, zone, csek))
}

pub fn stop_instance(name: &str, account: &str, project: &str, zone: &str) -> GmachineResult<()> {
    run(
        None,
        &lifecycle_args("stop", name, account, project, zone, &CsekBundle::default()),
    )
}

pub fn suspend_instance(name: &str, account: &str, project: &str, zone: &str) -> GmachineResult<()> {
    run(
        None,
        &lifecycle_args("suspend", name, account, project, zone, &CsekBundle::default()),
    )
}

/// Resume a suspended instance, feeding the CSEK bundle on stdin when present.
pub fn resume_instance(
    name: &str,
    account: &str,
    project: &str,
    zone: &str,
    csek: &CsekBundle,
) -> GmachineResult<()> {
    let stdin = if csek.is_empty() {
        None
    } else {
        Some(csek.to_json()?)
    };
    run(stdin, &lifecycle_args("resume", name, account, project, zone, csek))
}

pub fn resize_instance(
    name: &str,
    account: &str,
    project: &str,
    zone: &str,
    machine_type: &str,
) -> GmachineResult<()> {
    run(
        None,
        &[
            "gcloud".into(),
            "compute".into(),
            "instances".into(),
            "set-machine-type".into(),
            name.into(),
            format!("--account={account}"),
            format!("--project={project}"),
            format!("--zone={zone}"),
            format!("--machine-type={machine_type}"),
        ],
    )
}

/// Print the instance's NAT IP via the provider's format expression.
pub fn print_ip(name: &str, account: &str, project: &str, zone: &str) -> GmachineResult<()> {
    run(
        None,
        &[
            "gcloud".into(),
            "beta".into(),
            "compute".into(),
            "instances".into(),
            "describe".into(),
            name.into(),
            format!("--account={account}"),
            format!("--project={project}"),
            format!("--zone={zone}"),
            "--format=get(networkInterfaces[0].accessConfigs[0].natIP)".into(),
        ],
    )
}

/// Replace the current process with `gcloud compute ssh`.
pub fn ssh_instance(
    name: &str,
    account: &str,
    project: &str,
    zone: &str,
    extra: &str,
) -> GmachineResult<()> {
    let mut args: Vec<String> = vec![
        "gcloud".into(),
        "compute".into(),
        "ssh".into(),
        name.into(),
        format!("--account={account}"),
        format!("--project={project}"),
        format!("--zone={zone}"),
    ];
    if !extra.is_empty() {
        args.push("--".into());
        args.extend(extra.split_whitespace().map(String::from));
    }
    exec_replace(&args)
}

/// Web console URL for an instance's detail page.
pub fn console_url(name: &str, project: &str, zone: &str, authuser: &str) -> String {
    let mut url = format!(
        "https://console.cloud.google.com/compute/instancesDetail/zones/{zone}/instances/{name}?project={project}"
    );
    if !authuser.is_empty() {
        url.push_str("&authuser=");
        url.push_str(authuser);
    }
    url
}

/// Open `url` with the platform opener.
pub fn open_url(url: &str) -> GmachineResult<()> {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";

    run(None, &[opener.into(), url.into()])
}

/// The currently active gcloud account, per `gcloud auth list`.
pub fn current_account() -> GmachineResult<String> {
    let out = output(&[
        "gcloud".into(),
        "auth".into(),
        "list".into(),
        "--filter=status:ACTIVE".into(),
        "--format=value(account)".into(),
    ])?;
    Ok(String::from_utf8_lossy(&out).trim().to_string())
}

/// Fully-qualified URI for a zonal disk.
pub fn disk_uri(project: &str, zone: &str, disk: &str) -> String {
    format!(
        "https://www.googleapis.com/compute/v1/projects/{project}/zones/{zone}/disks/{disk}"
    )
}

/// Spawn a command with inherited stdout/stderr, optionally feeding bytes on
/// stdin, and wait for it to exit.
fn run(stdin_bytes: Option<Vec<u8>>, args: &[String]) -> GmachineResult<()> {
    let mut cmd = Command::new(&args[0]);
    cmd.args(&args[1..]).env("PYTHONUNBUFFERED", "1");
    if stdin_bytes.is_some() {
        cmd.stdin(Stdio::piped());
    }

    let mut child = cmd.spawn()?;
    if let Some(bytes) = stdin_bytes {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&bytes)?;
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(GmachineError::Provider {
            message: format!("{} exited with {status}", args[0]),
        });
    }
    Ok(())
}

/// Run a command and capture its output. A non-zero exit produces an error
/// carrying whatever the tool printed.
fn output(args: &[String]) -> GmachineResult<Vec<u8>> {
    let out = Command::new(&args[0]).args(&args[1..]).output()?;
    if !out.status.success() {
        let mut combined = out.stdout;
        combined.extend_from_slice(&out.stderr);
        return Err(GmachineError::Provider {
            message: format!(
                "{} exited with {}: {}",
                args[0],
                out.status,
                String::from_utf8_lossy(&combined).trim()
            ),
        });
    }
    Ok(out.stdout)
}

/// Replace the current process with the given command.
#[cfg(unix)]
fn exec_replace(args: &[String]) -> GmachineResult<()> {
    use std::os::unix::process::CommandExt;
    let err = Command::new(&args[0]).args(&args[1..]).exec();
    Err(err.into())
}

#[cfg(not(unix))]
fn exec_replace(args: &[String]) -> GmachineResult<()> {
    run(None, args)
}
