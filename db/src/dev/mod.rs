pub use self::builders::*;
pub use self::project::TestProject;

pub mod builders;
mod project;
