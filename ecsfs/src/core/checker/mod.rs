// SPDX-License-Identifier: MIT

mod tracker;
mod types;

pub use tracker::ReachabilityTracker;
pub use types::{
    CheckPhases, CoreVerifyOptions, Finding, ReportDisplay, ReportDisplayOpts, Severity,
    VerifierOptionsLike, VerifyReport,
};

pub use crate::core::errors::{FsCheckerError, FsCheckerResult};

/// Trait for verifying the integrity of a filesystem.
///
/// Each phase appends findings to the report; a phase only returns `Err`
/// when it cannot run at all (e.g. the block store fails).
pub trait FsChecker {
    type Options: VerifierOptionsLike + Default;

    fn check_with(&mut self, opt: &Self::Options) -> FsCheckerResult<VerifyReport> {
        let mut rep = VerifyReport::default();
        self.run_phase(opt, &mut rep, CheckPhases::SUPERBLOCK, Self::check_superblock)?;
        self.run_phase(opt, &mut rep, CheckPhases::FAT, Self::check_fat)?;
        self.run_phase(opt, &mut rep, CheckPhases::ROOT, Self::check_root)?;
        self.run_phase(opt, &mut rep, CheckPhases::CHAINS, Self::check_chains)?;
        self.run_phase(opt, &mut rep, CheckPhases::LEAKS, Self::check_leaks)?;
        self.run_phase(opt, &mut rep, CheckPhases::PERSISTED, Self::check_persisted)?;
        Ok(rep)
    }

    fn check_superblock(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_fat(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_root(&mut self, _opt: &Self::Options, _rep: &mut VerifyReport) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_chains(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_leaks(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }
    fn check_persisted(
        &mut self,
        _opt: &Self::Options,
        _rep: &mut VerifyReport,
    ) -> FsCheckerResult<()> {
        Ok(())
    }

    fn run_phase<F>(
        &mut self,
        opt: &Self::Options,
        rep: &mut VerifyReport,
        phase: CheckPhases,
        f: F,
    ) -> FsCheckerResult<()>
    where
        F: Fn(&mut Self, &Self::Options, &mut VerifyReport) -> FsCheckerResult<()>,
    {
        if !opt.phases().contains(phase) {
            return Ok(());
        }
        if opt.fail_fast() && rep.has_error() {
            return Ok(());
        }
        f(self, opt, rep)
    }
}
