use crate::{
    GraphError,
    backend::{EdgeSpec, GraphBackend, NodeSpec},
    derive::{ChainDeriver, Derivation},
    graph::GraphEntity,
    strength::StrengthTable,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub backend: String,
    pub database: String,
    pub command: String,
    pub command_args: Vec<String>,
    pub verbose: bool,
}

impl CommandLineConfig {
    /// Flags before the command word configure the client; everything after it is
    /// handed to the command.
    pub fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut backend = String::from("sqlite");
        let mut database = String::from("memory");
        let mut command = String::from("status");
        let mut command_args = Vec::new();
        let mut verbose = false;
        let mut command_set = false;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            if command_set {
                command_args.push(arg.to_string());
                continue;
            }
            match *arg {
                "--backend" => {
                    backend = iter
                        .next()
                        .ok_or_else(|| "--backend requires a value".to_string())?
                        .to_string();
                }
                "--db" | "--database" => {
                    database = iter
                        .next()
                        .ok_or_else(|| "--db requires a value".to_string())?
                        .to_string();
                }
                "--command" => {
                    command = iter
                        .next()
                        .ok_or_else(|| "--command requires a value".to_string())?
                        .to_string();
                    command_set = true;
                }
                "--verbose" | "-v" => {
                    verbose = true;
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => {
                    command = arg.to_string();
                    command_set = true;
                }
            }
        }
        Ok(Self {
            backend,
            database,
            command,
            command_args,
            verbose,
        })
    }

    pub fn help() -> &'static str {
        "Usage: archigraph [--backend sqlite] [--db memory|PATH] [--verbose] <command> [args]\n\
         \n\
         Commands:\n  \
           status\n  \
           list\n  \
           add-node --kind KIND --name NAME\n  \
           add-edge --from ID --to ID --type RC_TYPE\n  \
           derive --nodes ID,ID[,ID...]\n\
         \n\
         Set ARCHIGRAPH_LOG (e.g. archigraph=debug) to control logging.\n"
    }
}

pub struct BackendClient<B> {
    backend: B,
    table: StrengthTable,
}

impl<B> BackendClient<B> {
    pub fn new(backend: B) -> Self {
        Self::with_table(backend, StrengthTable::archimate())
    }

    pub fn with_table(backend: B, table: StrengthTable) -> Self {
        Self { backend, table }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn table(&self) -> &StrengthTable {
        &self.table
    }
}

impl<B> BackendClient<B>
where
    B: GraphBackend,
{
    pub fn insert_node(&self, node: NodeSpec) -> Result<i64, GraphError> {
        self.backend.insert_node(node)
    }

    pub fn insert_edge(&self, edge: EdgeSpec) -> Result<i64, GraphError> {
        self.backend.insert_edge(edge)
    }

    pub fn nodes(&self) -> Result<Vec<GraphEntity>, GraphError> {
        let mut entities = Vec::new();
        for id in self.backend.entity_ids()? {
            if let Some(entity) = self.backend.get_node(id)? {
                entities.push(entity);
            }
        }
        Ok(entities)
    }

    pub fn derive(&self, nodes: &[i64]) -> Result<Derivation, GraphError> {
        ChainDeriver::new(&self.backend, &self.table).derive(nodes)
    }
}
