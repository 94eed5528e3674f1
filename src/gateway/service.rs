//! Two-channel gateway
//!
//! Each channel owns its ledger. Write functions run in a transaction that
//! commits on success and is discarded on error; a committed channel is then
//! persisted to its snapshot file, if it has one. Workflows that touch both
//! channels use one transaction per channel and are not atomic as a whole.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use super::channel::Channel;
use super::errors::{GatewayError, GatewayResult};
use super::referral::{filing_date, ReferralPolicy};
use crate::contract::{
    expect_args, is_read_only, to_json, AuthorityContract, Contract, ContractError, ContractResult,
    RightsHolderContract,
};
use crate::ledger::{LedgerStub, MemoryLedger};
use crate::observability::{log_event_with_fields, Event};
use crate::registry::{
    Copyright, InvestigationReport, InvestigationSubmission, PiracyVerdict, RegistryOptions, Report,
    ReportFiling,
};
use crate::store::DocumentStore;

/// Snapshot file of the rights-holder channel inside the data directory
pub const RIGHTS_HOLDER_SNAPSHOT: &str = "rights_holder.ledger";

/// Snapshot file of the authority channel inside the data directory
pub const AUTHORITY_SNAPSHOT: &str = "authority.ledger";

const GATEWAY_FUNCTIONS: &[&str] = &["fileReport", "referReport"];

/// A report as submitted by a rights holder, before the gateway stamps the
/// date and initial verdict
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfringementNotice {
    pub url: String,
    pub site: String,
    pub copyright_serial: String,
    pub pirate: String,
    pub reporter_email: String,
    pub form: String,
    pub similarity: String,
}

/// Outcome of `Gateway::file_report`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiledReport {
    pub report: Report,
    /// Investigation opened on the authority channel, if the report was referred
    pub referral: Option<InvestigationReport>,
}

#[derive(Debug)]
struct ChannelLedger {
    channel: Channel,
    ledger: MemoryLedger,
    snapshot: Option<PathBuf>,
}

impl ChannelLedger {
    fn in_memory(channel: Channel) -> Self {
        Self {
            channel,
            ledger: MemoryLedger::new(),
            snapshot: None,
        }
    }

    fn open(channel: Channel, path: PathBuf) -> GatewayResult<Self> {
        let ledger = MemoryLedger::load(&path).map_err(|source| GatewayError::Load {
            channel: channel.as_str(),
            source,
        })?;
        Ok(Self {
            channel,
            ledger,
            snapshot: Some(path),
        })
    }

    /// Run `op` in a fresh transaction; commit and persist if `write`
    fn transact<T, F>(&mut self, write: bool, op: F) -> GatewayResult<T>
    where
        F: FnOnce(&mut dyn LedgerStub) -> ContractResult<T>,
    {
        let mut tx = self.ledger.begin();
        let out = op(&mut tx)?;
        if !write {
            tx.rollback();
            return Ok(out);
        }
        // A write that cannot be saved is undone in memory as well
        let channel = self.channel;
        let snapshot = self.snapshot.as_deref();
        tx.commit_and(|ledger| persist(channel, ledger, snapshot))?;
        Ok(out)
    }
}

fn persist(channel: Channel, ledger: &MemoryLedger, snapshot: Option<&Path>) -> GatewayResult<()> {
    match snapshot {
        Some(path) => ledger.save(path).map_err(|source| GatewayError::Persist {
            channel: channel.as_str(),
            source,
        }),
        None => Ok(()),
    }
}

/// Routes requests to the rights-holder and authority contracts
#[derive(Debug)]
pub struct Gateway {
    rights_holder: ChannelLedger,
    authority: ChannelLedger,
    rights_holder_contract: RightsHolderContract,
    authority_contract: AuthorityContract,
    policy: ReferralPolicy,
}

impl Gateway {
    /// Gateway over two empty ledgers that are never persisted
    pub fn in_memory(options: &RegistryOptions, policy: ReferralPolicy) -> Self {
        Self {
            rights_holder: ChannelLedger::in_memory(Channel::RightsHolder),
            authority: ChannelLedger::in_memory(Channel::Authority),
            rights_holder_contract: RightsHolderContract::new(options),
            authority_contract: AuthorityContract::new(options),
            policy,
        }
    }

    /// Gateway over the snapshots in `data_dir`. Missing snapshots start empty.
    pub fn open(data_dir: &Path, options: &RegistryOptions, policy: ReferralPolicy) -> GatewayResult<Self> {
        Ok(Self {
            rights_holder: ChannelLedger::open(
                Channel::RightsHolder,
                data_dir.join(RIGHTS_HOLDER_SNAPSHOT),
            )?,
            authority: ChannelLedger::open(Channel::Authority, data_dir.join(AUTHORITY_SNAPSHOT))?,
            rights_holder_contract: RightsHolderContract::new(options),
            authority_contract: AuthorityContract::new(options),
            policy,
        })
    }

    pub fn policy(&self) -> ReferralPolicy {
        self.policy
    }

    /// Committed rights-holder world state
    pub fn rights_holder_ledger(&self) -> &MemoryLedger {
        &self.rights_holder.ledger
    }

    /// Committed authority world state
    pub fn authority_ledger(&self) -> &MemoryLedger {
        &self.authority.ledger
    }

    pub fn rights_holder_ledger_mut(&mut self) -> &mut MemoryLedger {
        &mut self.rights_holder.ledger
    }

    pub fn authority_ledger_mut(&mut self) -> &mut MemoryLedger {
        &mut self.authority.ledger
    }

    /// Invoke `function` on `channel`
    ///
    /// `query*` functions are evaluated against committed state and never
    /// committed. Everything else is submitted.
    pub fn invoke(&mut self, channel: Channel, function: &str, args: &[String]) -> GatewayResult<Value> {
        let write = !is_read_only(function);
        match channel {
            Channel::RightsHolder => {
                let contract = self.rights_holder_contract;
                self.rights_holder
                    .transact(write, |tx| contract.invoke(tx, function, args))
            }
            Channel::Authority => {
                let contract = self.authority_contract;
                self.authority
                    .transact(write, |tx| contract.invoke(tx, function, args))
            }
            Channel::Gateway => self.invoke_workflow(function, args),
        }
    }

    fn invoke_workflow(&mut self, function: &str, args: &[String]) -> GatewayResult<Value> {
        match function {
            "fileReport" => {
                let [no, url, site, copyright_no, pirate, email, form, similarity] =
                    expect_args::<8>(function, args)?;
                let notice = InfringementNotice {
                    url: url.clone(),
                    site: site.clone(),
                    copyright_serial: copyright_no.clone(),
                    pirate: pirate.clone(),
                    reporter_email: email.clone(),
                    form: form.clone(),
                    similarity: similarity.clone(),
                };
                let filed = self.file_report(no, notice)?;
                Ok(to_json(&filed)?)
            }
            "referReport" => {
                let [no] = expect_args::<1>(function, args)?;
                let referral = self.refer_report(no)?;
                Ok(to_json(&referral)?)
            }
            _ => Err(ContractError::UnknownFunction {
                contract: Channel::Gateway.as_str(),
                function: function.to_string(),
            }
            .into()),
        }
    }

    /// Functions accepted on `channel`
    pub fn functions(&self, channel: Channel) -> &'static [&'static str] {
        match channel {
            Channel::RightsHolder => self.rights_holder_contract.functions(),
            Channel::Authority => self.authority_contract.functions(),
            Channel::Gateway => GATEWAY_FUNCTIONS,
        }
    }

    /// File a report, judging it from its similarity score
    ///
    /// The report is dated now. A score above the policy threshold files it as
    /// `true` and, with `auto_refer`, forwards it to the authority. If the
    /// referral fails the filed report stays committed and the error is
    /// returned.
    pub fn file_report(&mut self, serial: &str, notice: InfringementNotice) -> GatewayResult<FiledReport> {
        let verdict = self.policy.verdict_for(&notice.similarity);
        let filing = ReportFiling {
            url: notice.url,
            site: notice.site,
            copyright_serial: notice.copyright_serial,
            pirate: notice.pirate,
            reporter_email: notice.reporter_email,
            date: filing_date(),
            form: notice.form,
            similarity: notice.similarity,
            is_pirated: verdict,
        };

        let contract = self.rights_holder_contract;
        let report = self
            .rights_holder
            .transact(true, |tx| Ok(contract.reports().create(tx, serial, filing)?))?;

        let referral = if verdict == PiracyVerdict::True && self.policy.auto_refer {
            Some(self.refer_report(serial)?)
        } else {
            None
        };

        Ok(FiledReport { report, referral })
    }

    /// Forward rights-holder report `serial` to the authority channel
    ///
    /// The copyright's title, content type and author are copied into the
    /// investigation. The authority report reuses the same serial.
    pub fn refer_report(&mut self, serial: &str) -> GatewayResult<InvestigationReport> {
        let contract = self.rights_holder_contract;
        let (report, copyright) = self.rights_holder.transact(false, |tx| {
            let report = contract.reports().query_one(tx, serial)?;
            let copyright: Copyright = DocumentStore::require(tx, &report.copyright_id)?;
            Ok((report, copyright))
        })?;

        let submission = InvestigationSubmission {
            url: report.url,
            site: report.site,
            title: copyright.title,
            content_type: copyright.content_type,
            author: copyright.author,
            pirate: report.pirate,
            reporter_email: report.reporter_email,
            date: report.date,
            form: report.form,
            similarity: report.similarity,
        };

        let authority = self.authority_contract;
        let investigation = self
            .authority
            .transact(true, |tx| Ok(authority.investigations().create(tx, serial, submission)?))?;

        log_event_with_fields(
            Event::ReportReferred,
            &[("copyright", &report.copyright_id), ("key", &investigation.id)],
        );
        Ok(investigation)
    }
}
