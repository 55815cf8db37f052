//! Job/candidate matching: the pairwise scorer, its eligibility gate and the
//! listings assembled from it.

pub mod domain;
pub mod import;
pub mod listing;
pub mod matching;
pub mod request;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{CandidateId, CandidateProfile, JobId, JobPosting};
pub use import::{CandidateImportError, CandidateImporter};
pub use listing::{JobBoardEntry, RankedCandidate, RecommendedJob};
pub use matching::{
    Eligibility, JobMatchScorer, MatchComponent, MatchFactor, MatchInput, MatchResult,
    MatchStatus, MatchingConfig,
};
pub use request::{CandidateListRequest, CandidateRequest, JobRequest, MatchRequest};
pub use router::{jobs_router, CandidateListing};
