use serde_json::{Map, Value, json};

use crate::{
    GraphError,
    backend::{EdgeSpec, GraphBackend, NodeSpec},
    client::BackendClient,
    derive::Derivation,
};

const ERR_PREFIX: &str = "cli";

/// Runs `command` and returns its JSON output. `None` means the command is unknown.
pub fn handle_command<B: GraphBackend>(
    client: &BackendClient<B>,
    command: &str,
    args: &[String],
) -> Result<Option<String>, GraphError> {
    match command {
        "status" => run_status(client).map(Some),
        "list" => run_list(client).map(Some),
        "add-node" => run_add_node(client, args).map(Some),
        "add-edge" => run_add_edge(client, args).map(Some),
        "derive" => run_derive(client, args).map(Some),
        _ => Ok(None),
    }
}

pub fn run_status<B: GraphBackend>(client: &BackendClient<B>) -> Result<String, GraphError> {
    let nodes = client.backend().entity_ids()?.len();
    let mut object = Map::new();
    object.insert("command".into(), Value::String("status".into()));
    object.insert("backend".into(), Value::String("sqlite".into()));
    object.insert("nodes".into(), json!(nodes));
    encode(object)
}

fn run_list<B: GraphBackend>(client: &BackendClient<B>) -> Result<String, GraphError> {
    let nodes = client
        .nodes()?
        .into_iter()
        .map(|entity| json!({"id": entity.id, "kind": entity.kind, "name": entity.name}))
        .collect::<Vec<_>>();
    let mut object = Map::new();
    object.insert("command".into(), Value::String("list".into()));
    object.insert("nodes".into(), Value::Array(nodes));
    encode(object)
}

fn run_add_node<B: GraphBackend>(
    client: &BackendClient<B>,
    args: &[String],
) -> Result<String, GraphError> {
    let kind = required_value(args, "--kind")?;
    let name = required_value(args, "--name")?;
    let id = client.insert_node(NodeSpec {
        kind,
        name,
        data: json!({}),
    })?;
    let mut object = Map::new();
    object.insert("command".into(), Value::String("add-node".into()));
    object.insert("id".into(), json!(id));
    encode(object)
}

fn run_add_edge<B: GraphBackend>(
    client: &BackendClient<B>,
    args: &[String],
) -> Result<String, GraphError> {
    let from = parse_required_i64(args, "--from")?;
    let to = parse_required_i64(args, "--to")?;
    let edge_type = required_value(args, "--type")?;
    let id = client.insert_edge(EdgeSpec {
        from,
        to,
        edge_type,
        data: json!({}),
    })?;
    let mut object = Map::new();
    object.insert("command".into(), Value::String("add-edge".into()));
    object.insert("id".into(), json!(id));
    encode(object)
}

fn run_derive<B: GraphBackend>(
    client: &BackendClient<B>,
    args: &[String],
) -> Result<String, GraphError> {
    let nodes = parse_node_list(&required_value(args, "--nodes")?)?;
    let mut object = Map::new();
    object.insert("command".into(), Value::String("derive".into()));
    object.insert("nodes".into(), json!(nodes));
    match client.derive(&nodes)? {
        Derivation::Derived(relationship) => {
            object.insert("derived".into(), Value::Bool(true));
            object.insert(
                "relationship".into(),
                serde_json::to_value(&relationship)
                    .map_err(|e| invalid(format!("{ERR_PREFIX} serialization failed: {e}")))?,
            );
        }
        Derivation::Failed(failure) => {
            object.insert("derived".into(), Value::Bool(false));
            object.insert("reason".into(), Value::String(failure.to_string()));
        }
    }
    encode(object)
}

/// Parses `1,2,3`. Blank input is an empty chain, which derivation reports as too short.
pub fn parse_node_list(raw: &str) -> Result<Vec<i64>, GraphError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| invalid(format!("--nodes expects integer ids, got {part:?}")))
        })
        .collect()
}

fn parse_required_i64(args: &[String], flag: &str) -> Result<i64, GraphError> {
    let value = required_value(args, flag)?;
    value
        .parse::<i64>()
        .map_err(|_| invalid(format!("{flag} expects an integer")))
}

fn required_value(args: &[String], flag: &str) -> Result<String, GraphError> {
    value(args, flag).ok_or_else(|| invalid(format!("missing {flag}")))
}

fn value(args: &[String], flag: &str) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter.next().cloned();
        }
    }
    None
}

fn encode(object: Map<String, Value>) -> Result<String, GraphError> {
    serde_json::to_string(&Value::Object(object))
        .map_err(|e| invalid(format!("{ERR_PREFIX} serialization failed: {e}")))
}

fn invalid<T: Into<String>>(message: T) -> GraphError {
    GraphError::invalid_input(message.into())
}
