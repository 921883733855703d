//! Machine-readable NIST-family failure reason codes (spec §6 "error
//! taxonomy values"), kept alongside a [`crate::error::PluginError`]'s
//! human-readable message for internal bookkeeping. Never serialised as
//! part of the Report; the Report only ever sees a [`steer_core::Criterion`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureReason {
    BlockLengthGTRecommended,
    NumberOfCyclesGTMax,
}

impl FailureReason {
    pub fn label(self) -> &'static str {
        match self {
            FailureReason::BlockLengthGTRecommended => "BlockLengthGTRecommended",
            FailureReason::NumberOfCyclesGTMax => "NumberOfCyclesGTMax",
        }
    }
}
