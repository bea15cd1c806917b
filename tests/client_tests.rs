use archigraph::{
    BackendClient, EdgeSpec, NodeSpec, SqliteGraphBackend, cli::parse_node_list,
    client::CommandLineConfig,
};
use serde_json::json;

#[test]
fn test_command_line_defaults() {
    let config = CommandLineConfig::from_args(&["archigraph"]).unwrap();
    assert_eq!(config.backend, "sqlite");
    assert_eq!(config.database, "memory");
    assert_eq!(config.command, "status");
    assert!(config.command_args.is_empty());
    assert!(!config.verbose);
}

#[test]
fn test_command_line_collects_command_arguments() {
    let config = CommandLineConfig::from_args(&[
        "archigraph",
        "--db",
        "graph.db",
        "-v",
        "derive",
        "--nodes",
        "1,2",
    ])
    .unwrap();
    assert_eq!(config.database, "graph.db");
    assert!(config.verbose);
    assert_eq!(config.command, "derive");
    assert_eq!(config.command_args, vec!["--nodes", "1,2"]);
}

#[test]
fn test_command_line_errors() {
    assert!(CommandLineConfig::from_args(&["archigraph", "--db"]).is_err());
    assert!(CommandLineConfig::from_args(&["archigraph", "--nope"]).is_err());
}

#[test]
fn test_parse_node_list() {
    assert_eq!(parse_node_list("1, 2,3").unwrap(), vec![1, 2, 3]);
    assert!(parse_node_list("  ").unwrap().is_empty());
    assert!(parse_node_list("1,,2").is_err());
}

#[test]
fn test_client_derives_with_its_table() {
    let client = BackendClient::new(SqliteGraphBackend::in_memory().unwrap());
    let a = client
        .insert_node(NodeSpec {
            kind: "APP_COMP".into(),
            name: "a".into(),
            data: json!({}),
        })
        .unwrap();
    let b = client
        .insert_node(NodeSpec {
            kind: "DATA_OBJ".into(),
            name: "b".into(),
            data: json!({}),
        })
        .unwrap();
    client
        .insert_edge(EdgeSpec {
            from: a,
            to: b,
            edge_type: "RC_ACCESS".into(),
            data: json!({}),
        })
        .unwrap();
    let derivation = client.derive(&[a, b]).unwrap();
    assert!(derivation.is_derived());
    assert_eq!(derivation.relationship().unwrap().kind.as_str(), "RC_ACCESS");
    assert_eq!(client.nodes().unwrap().len(), 2);
}
