//! Property names of the team workspace databases.

pub mod task {
    pub const NAME: &str = "Task name";
    pub const STORY_ID: &str = "Story ID";
    pub const STATUS: &str = "Status";
    pub const ASSIGNEE: &str = "Assignee";
    pub const REVIEWER: &str = "Reviewer";
    pub const PRIORITY: &str = "Priority";
    pub const PROJECT: &str = "Project";
    pub const ESTIMATE: &str = "estimate hours";
    pub const SPRINT: &str = "Sprint";
}

pub mod sprint {
    pub const NAME: &str = "Sprint name";
    pub const STATUS: &str = "Sprint status";
    pub const ID: &str = "Sprint ID";

    /// Status label of the sprint in progress.
    pub const CURRENT: &str = "Current";
}

pub mod hours {
    pub const USER: &str = "codeployer";
    pub const PROJECT: &str = "progetto";
    pub const TASK: &str = "task";
    pub const COMMISSION: &str = "commessa";
    pub const DATE: &str = "data";
    pub const HOURS: &str = "ore";
}

pub mod project {
    pub const NAME: &str = "Project name";
}
