use std::io::Write;

use ajera_core::{project_data, project_data_full, AjeraClient, Transport};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::args::Command;

/// Run `command` inside one session and write its JSON result to `out`.
pub fn run<T: Transport>(
    client: &mut AjeraClient<T>,
    command: Command,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    let value = client.with_session(|client| query(client, command))?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    writeln!(out, "{rendered}").context("failed to write output")?;
    Ok(())
}

fn query<T: Transport>(client: &mut AjeraClient<T>, command: Command) -> ajera_core::Result<Value> {
    let value = match command {
        Command::List { filters } => {
            let listed = client.list_projects(filters.into_list_args())?;
            info!(count = listed.content.projects.len(), "projects listed");
            serde_json::to_value(listed.content.projects)?
        }
        Command::Projects { filters, full: false } => {
            let projects = project_data(client, filters.into_list_args())?;
            info!(count = projects.len(), "projects fetched");
            serde_json::to_value(projects)?
        }
        Command::Projects { filters, full: true } => {
            let content = project_data_full(client, filters.into_list_args())?;
            info!(count = content.projects.len(), "projects fetched");
            serde_json::to_value(content)?
        }
        Command::Get { keys } => serde_json::to_value(client.get_projects(keys)?.content)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use ajera_core::testing::{envelope, session_content, ScriptedTransport};
    use ajera_core::AjeraConfig;
    use serde_json::json;

    fn client(transport: &ScriptedTransport) -> AjeraClient<&ScriptedTransport> {
        let config = AjeraConfig {
            api_url: "http://ajera.test/AjeraAPI.ashx".into(),
            username: "janedoe".into(),
            password: "j@ned0e".into(),
            use_session_cookie: false,
        };
        AjeraClient::with_transport(&config, transport)
    }

    fn output(out: Vec<u8>) -> Value {
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn list_prints_summaries_and_closes_the_session() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok")));
        transport.push_json(envelope(json!({
            "Projects": [{"ProjectKey": 166778, "ID": "23-28222-001", "Description": "Wet wells"}]
        })));
        transport.push_json(envelope(json!({})));

        let mut client = client(&transport);
        let filters = FilterArgs {
            id_like: Some("28222".into()),
            ..Default::default()
        };
        let mut out = Vec::new();
        run(&mut client, Command::List { filters }, false, &mut out).unwrap();

        assert_eq!(
            output(out),
            json!([{"ProjectKey": 166778, "ID": "23-28222-001", "Description": "Wet wells"}])
        );
        let methods: Vec<Value> = transport
            .request_bodies()
            .into_iter()
            .map(|body| body["Method"].clone())
            .collect();
        assert_eq!(
            methods,
            vec![json!("CreateAPISession"), json!("ListProjects"), json!("EndAPISession")]
        );
        assert!(!client.is_active());
    }

    #[test]
    fn failed_query_still_ends_the_session() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok")));
        transport.push_json(json!({"ResponseCode": 500, "Message": "Error", "Errors": ["boom"]}));
        transport.push_json(envelope(json!({})));

        let mut client = client(&transport);
        let mut out = Vec::new();
        let err = run(&mut client, Command::Get { keys: vec![1] }, false, &mut out).unwrap_err();

        assert!(err.to_string().contains("GetProjects"));
        assert!(out.is_empty());
        assert_eq!(transport.request_bodies()[2]["Method"], "EndAPISession");
    }

    #[test]
    fn full_projects_include_linked_records() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok")));
        transport.push_json(envelope(json!({"Projects": []})));
        transport.push_json(envelope(json!({"Projects": [], "InvoiceGroups": [], "Phases": []})));
        transport.push_json(envelope(json!({})));

        let mut client = client(&transport);
        let mut out = Vec::new();
        let command = Command::Projects {
            filters: FilterArgs::default(),
            full: true,
        };
        run(&mut client, command, true, &mut out).unwrap();

        assert_eq!(output(out), json!({"Projects": [], "InvoiceGroups": [], "Phases": []}));
    }
}
