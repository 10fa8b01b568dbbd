//! Bounded-concurrency status aggregation.
//!
//! Fans one describe call out per machine across a fixed-size pool of worker
//! threads, collects per-machine outcomes over an mpsc channel, and feeds
//! rows to a single consumer (the calling thread) so the presenter is only
//! ever written from one place. A failed describe is reported to the warning
//! sink and contributes no row; it never aborts the sibling tasks. Rows land
//! in describe-completion order, not registry order.
//!
//! No timeout is enforced on a describe call; a hung external call occupies
//! its worker slot until the process is killed.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use crate::error::{GmachineError, GmachineResult};
use crate::gcloud::{Describer, Instance, NetworkInterface};
use crate::models::MachineRecord;
use crate::registry::Registry;
use crate::table::Presenter;

/// Ceiling on in-flight describe calls. Each call is a full subprocess
/// invocation with real latency and provider rate-limit exposure.
pub const MAX_CONCURRENT_DESCRIBES: usize = 8;

/// Header row of the status table.
pub const STATUS_COLUMNS: [&str; 12] = [
    "NAME",
    "ACCOUNT",
    "PROJECT",
    "ZONE",
    "MACHINE_TYPE",
    "PREEMPTIBLE",
    "ENCRYPTED",
    "SERVICE_ACCOUNT",
    "INTERNAL_IP",
    "EXTERNAL_IP",
    "STATUS",
    "DEFAULT",
];

/// Produce one status row per machine in `names`.
///
/// Every name is resolved against the registry before any work is launched;
/// an unknown name is a registry error and aborts the whole aggregation with
/// no table. Blocks until every launched task has completed and the
/// presenter has flushed, then returns the number of per-machine describe
/// failures. The registry is only read during aggregation.
pub fn aggregate_status(
    registry: &Registry,
    names: &[String],
    describer: &dyn Describer,
    presenter: &mut dyn Presenter,
    warn: &mut dyn FnMut(&GmachineError),
) -> GmachineResult<usize> {
    let records: Vec<MachineRecord> = names
        .iter()
        .map(|name| registry.get(name))
        .collect::<GmachineResult<_>>()?;

    presenter.row(STATUS_COLUMNS.iter().map(|c| c.to_string()).collect());

    let default_name = registry.get_default();
    let queue = Mutex::new(records.into_iter());
    let workers = names.len().min(MAX_CONCURRENT_DESCRIBES);

    let failures = thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<GmachineResult<Vec<String>>>();

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            let default_name = default_name.as_str();
            handles.push(scope.spawn(move || loop {
                // pull the next record; the Mutex around the iterator is the
                // entire work-distribution mechanism
                let record = queue.lock().expect("work queue poisoned").next();
                let Some(record) = record else { break };

                let result = describe_row(describer, &record, default_name);
                if tx.send(result).is_err() {
                    break;
                }
            }));
        }
        drop(tx);

        // single consumer: the only writer to the presenter
        let mut failures = 0usize;
        for outcome in rx {
            match outcome {
                Ok(row) => presenter.row(row),
                Err(err) => {
                    failures += 1;
                    warn(&err);
                }
            }
        }

        for handle in handles {
            if handle.join().is_err() {
                return Err(GmachineError::Aggregation {
                    message: "describe worker panicked".to_string(),
                });
            }
        }
        Ok(failures)
    })?;

    presenter.flush()?;
    Ok(failures)
}

fn describe_row(
    describer: &dyn Describer,
    record: &MachineRecord,
    default_name: &str,
) -> GmachineResult<Vec<String>> {
    let instance = describer.describe(
        &record.name,
        &record.account,
        &record.project,
        &record.zone,
    )?;
    Ok(format_row(record, &instance, default_name))
}

fn format_row(record: &MachineRecord, instance: &Instance, default_name: &str) -> Vec<String> {
    vec![
        record.name.clone(),
        record.account.clone(),
        record.project.clone(),
        basename(&instance.zone).to_string(),
        basename(&instance.machine_type).to_string(),
        instance.scheduling.preemptible.to_string(),
        if record.encrypted() {
            "csek".to_string()
        } else {
            String::new()
        },
        instance
            .service_accounts
            .first()
            .map(|sa| sa.email.clone())
            .unwrap_or_default(),
        internal_ip(&instance.network_interfaces).to_string(),
        external_ip(&instance.network_interfaces).to_string(),
        instance.status.clone(),
        if record.name == default_name {
            "*".to_string()
        } else {
            String::new()
        },
    ]
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// First interface's internal IP, or empty.
fn internal_ip(interfaces: &[NetworkInterface]) -> &str {
    interfaces
        .first()
        .map(|i| i.network_ip.as_str())
        .unwrap_or("")
}

/// First interface's first access-config NAT IP, or empty.
fn external_ip(interfaces: &[NetworkInterface]) -> &str {
    interfaces
        .first()
        .and_then(|i| i.access_configs.first())
        .map(|a| a.nat_ip.as_str())
        .unwrap_or("")
}
