use archigraph::{
    GraphEdge, GraphEntity, GraphError, RelationshipKind, SqliteGraph, SqliteGraphBackend,
    StrengthTable,
};
use serde_json::json;

fn insert_entity(graph: &SqliteGraph, kind: &str, name: &str) -> i64 {
    graph
        .insert_entity(&GraphEntity {
            id: 0,
            kind: kind.into(),
            name: name.into(),
            data: json!({ "name": name }),
        })
        .expect("entity")
}

fn insert_edge(graph: &SqliteGraph, from: i64, to: i64, edge_type: &str) -> i64 {
    graph
        .insert_edge(&GraphEdge {
            id: 0,
            from_id: from,
            to_id: to,
            edge_type: edge_type.into(),
            data: json!({}),
        })
        .expect("edge")
}

#[test]
fn test_entity_round_trip_and_delete() {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let id = insert_entity(&graph, "APP_COMP", "Billing");
    let entity = graph.get_entity(id).expect("get");
    assert_eq!(entity.kind, "APP_COMP");
    assert_eq!(entity.name, "Billing");
    assert_eq!(entity.data, json!({ "name": "Billing" }));

    graph.delete_entity(id).expect("delete");
    assert!(matches!(graph.get_entity(id), Err(GraphError::NotFound(_))));
    assert!(matches!(
        graph.delete_entity(id),
        Err(GraphError::NotFound(_))
    ));
}

#[test]
fn test_entity_validation_rejects_blank_fields() {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let err = graph
        .insert_entity(&GraphEntity {
            id: 0,
            kind: " ".into(),
            name: "x".into(),
            data: json!({}),
        })
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidInput(_)));
}

#[test]
fn test_edge_validation() {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let a = insert_entity(&graph, "NODE", "a");
    let blank = graph.insert_edge(&GraphEdge {
        id: 0,
        from_id: a,
        to_id: a,
        edge_type: "".into(),
        data: json!({}),
    });
    assert!(matches!(blank, Err(GraphError::InvalidInput(_))));
    let dangling = graph.insert_edge(&GraphEdge {
        id: 0,
        from_id: a,
        to_id: a + 100,
        edge_type: "RC_SERVING".into(),
        data: json!({}),
    });
    assert!(matches!(dangling, Err(GraphError::InvalidInput(_))));
}

#[test]
fn test_self_loops_and_unrecognized_types_are_storable() {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let a = insert_entity(&graph, "NODE", "a");
    let looped = insert_edge(&graph, a, a, "RC_ASSOCIATION");
    let custom = insert_edge(&graph, a, a, "RC_INFLUENCE");
    assert_eq!(graph.get_edge(looped).unwrap().to_id, a);
    assert_eq!(graph.get_edge(custom).unwrap().edge_type, "RC_INFLUENCE");
}

#[test]
fn test_outgoing_edges_follow_insertion_order() {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let a = insert_entity(&graph, "NODE", "a");
    let b = insert_entity(&graph, "NODE", "b");
    let c = insert_entity(&graph, "NODE", "c");
    let first = insert_edge(&graph, a, c, "RC_SERVING");
    let second = insert_edge(&graph, a, b, "RC_ACCESS");
    let third = insert_edge(&graph, a, c, "RC_ACCESS");
    insert_edge(&graph, b, a, "RC_ACCESS");

    let ids = graph
        .outgoing_edges(a)
        .unwrap()
        .into_iter()
        .map(|edge| edge.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![first, second, third]);
    assert!(graph.outgoing_edges(a + 1000).unwrap().is_empty());
}

#[test]
fn test_outgoing_cache_invalidated_when_graph_changes() {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let a = insert_entity(&graph, "NODE", "a");
    let b = insert_entity(&graph, "NODE", "b");
    let c = insert_entity(&graph, "NODE", "c");

    insert_edge(&graph, a, b, "RC_SERVING");
    assert_eq!(graph.outgoing_edges(a).unwrap().len(), 1);

    let edge_ac = insert_edge(&graph, a, c, "RC_ACCESS");
    assert_eq!(graph.outgoing_edges(a).unwrap().len(), 2);

    graph.delete_edge(edge_ac).expect("delete edge");
    assert_eq!(graph.outgoing_edges(a).unwrap().len(), 1);

    graph.delete_entity(b).expect("delete entity");
    assert!(graph.outgoing_edges(a).unwrap().is_empty());
}

#[test]
fn test_on_disk_graph_persists_between_opens() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("graph.db");
    let (a, b) = {
        let graph = SqliteGraph::open(&path).unwrap();
        let a = insert_entity(&graph, "NODE", "a");
        let b = insert_entity(&graph, "NODE", "b");
        insert_edge(&graph, a, b, "RC_REALIZATION");
        (a, b)
    };
    let reopened = SqliteGraph::open(&path).unwrap();
    assert_eq!(reopened.list_entity_ids().unwrap(), vec![a, b]);
    let edges = reopened.outgoing_edges(a).unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].edge_type, "RC_REALIZATION");
}

#[test]
fn test_outgoing_cache_sees_commits_from_another_connection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("graph.db");
    let writer = SqliteGraph::open(&path).unwrap();
    let a = insert_entity(&writer, "NODE", "a");
    let b = insert_entity(&writer, "NODE", "b");
    insert_edge(&writer, a, b, "RC_COMPOSITION");

    let reader = SqliteGraphBackend::from_graph(SqliteGraph::open(&path).unwrap());
    let table = StrengthTable::archimate();
    let deriver = reader.deriver(&table);
    let first = deriver.derive(&[a, b]).unwrap().into_relationship().expect("derived");
    assert_eq!(first.kind, RelationshipKind::Composition);

    insert_edge(&writer, a, b, "RC_ASSOCIATION");
    assert_eq!(reader.graph().outgoing_edges(a).unwrap().len(), 2);
    let second = deriver.derive(&[a, b]).unwrap().into_relationship().expect("derived");
    assert_eq!(second.kind, RelationshipKind::Association);
}
