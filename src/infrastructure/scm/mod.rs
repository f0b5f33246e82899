/// SCM (Source Control Management) operations infrastructure
///
/// `VersionControlClient` is the port used by the use cases; `GitScm`
/// implements it by running the `git` executable.

pub mod git_scm;
pub mod scm_interface;

pub use git_scm::GitScm;
pub use scm_interface::{
    parse_remote_head, CommitSummary, ScmError, VersionControlClient, WorkingTreeStatus,
};

#[cfg(test)]
pub use scm_interface::MockVersionControlClient;
