mod collector;
mod mutator;
mod pacing;
mod purge;
mod select;

pub use collector::CollectError;
pub use collector::collect;
pub use mutator::BATCH_CEILING;
pub use mutator::MutateOp;
pub use mutator::MutationSummary;
pub use mutator::mutate;
pub use pacing::FixedDelay;
pub use pacing::NoDelay;
pub use pacing::Pacer;
pub use purge::Mode;
pub use purge::PurgeOutput;
pub use purge::Report;
pub use purge::purge;
pub use select::select_oldest;
