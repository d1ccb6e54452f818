//! Pure string rules used by the handlers.
//!
//! Each rule is a small function over free text (commit messages, pull
//! request titles and bodies, branch names) with no I/O.

mod issue_key;
mod parameterize;
mod pull_request_number;
mod release_title;

pub use issue_key::{IssueKey, extract_issue_key};
pub use parameterize::{issue_branch_name, parameterize};
pub use pull_request_number::extract_pull_request_number;
pub use release_title::{ReleaseTitle, release_notes_from_body};
