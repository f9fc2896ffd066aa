//! Composite queries built from the two business calls.

use tracing::debug;

use crate::client::AjeraClient;
use crate::error::Result;
use crate::schema::{GetProjectsContent, ListProjectsArgs, ProjectDetail};
use crate::transport::Transport;

/// List the projects matching `filters`, then fetch all of them in full.
///
/// Both calls must succeed; there are no partial results.
pub fn project_data<T: Transport>(
    client: &mut AjeraClient<T>,
    filters: ListProjectsArgs,
) -> Result<Vec<ProjectDetail>> {
    Ok(project_data_full(client, filters)?.projects)
}

/// Like [`project_data`] but keeps the phases and invoice groups as well.
pub fn project_data_full<T: Transport>(
    client: &mut AjeraClient<T>,
    filters: ListProjectsArgs,
) -> Result<GetProjectsContent> {
    let keys = client.list_projects(filters)?.content.keys();
    debug!(count = keys.len(), "fetching listed projects");
    Ok(client.get_projects(keys)?.content)
}
