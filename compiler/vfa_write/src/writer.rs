//! Top-level IR writer.
//!
//! [`IrWriter`] owns one writer per program graph plus the type and value
//! pools shared by all of them, and assembles the composite document:
//!
//! ```text
//! { "pag": {..}, "icfg": {..}, "chg": {..} | null, "module": {..},
//!   "symbolTable": {..}, "types": [null, ..], "values": [null, ..] }
//! ```
//!
//! Node maps are written first, in id order. Writing content can pool new
//! edges, types, values, loops and memory objects at any time, so the pools
//! are then drained round by round until a full round adds nothing.

use std::hash::Hash;
use std::io;

use serde_json::{Map, Value};
use tracing::debug;
use vfa_ir::{
    ChEdgeRef, Graph, GraphEdge, GraphNode, IcfgEdgeRef, Ir, LoopRef, MemObjRef, StmtRef, TypeRef,
    ValueRef,
};

use crate::config::WriterConfig;
use crate::encode::Encode;
use crate::error::{Violation, WriteError};
use crate::graph_writer::GraphWriter;
use crate::graphs::{ChgWriter, IcfgWriter, PagWriter};
use crate::pool::IdPool;

pub struct IrWriter<'ir> {
    pub(crate) ir: &'ir Ir,
    config: WriterConfig,
    pub(crate) pag: PagWriter<'ir>,
    pub(crate) icfg: IcfgWriter<'ir>,
    pub(crate) chg: ChgWriter<'ir>,
    types: IdPool<TypeRef>,
    values: IdPool<ValueRef>,
}

/// Emitted entries of each drained pool.
#[derive(Default)]
struct Drained {
    pag_edges: Vec<Value>,
    mem_objs: Vec<Value>,
    icfg_edges: Vec<Value>,
    loops: Vec<Value>,
    chg_edges: Vec<Value>,
    types: Vec<Value>,
    values: Vec<Value>,
}

impl Drained {
    /// Id-indexed pools start with the `null` entry for id 0.
    fn new() -> Self {
        Drained {
            mem_objs: vec![Value::Null],
            loops: vec![Value::Null],
            types: vec![Value::Null],
            values: vec![Value::Null],
            ..Drained::default()
        }
    }

    fn total(&self) -> usize {
        self.pag_edges.len()
            + self.mem_objs.len()
            + self.icfg_edges.len()
            + self.loops.len()
            + self.chg_edges.len()
            + self.types.len()
            + self.values.len()
    }
}

impl<'ir> IrWriter<'ir> {
    /// Build every graph writer. Node and edge numbering is fixed here.
    pub fn new(ir: &'ir Ir, config: WriterConfig) -> Self {
        let writer = IrWriter {
            ir,
            config,
            pag: PagWriter::new(&ir.pag),
            icfg: IcfgWriter::new(&ir.icfg),
            chg: ChgWriter::new(&ir.chg),
            types: IdPool::new("type"),
            values: IdPool::new("value"),
        };
        debug!(
            pag_edges = writer.pag.writer().edge_count(),
            mem_objs = writer.pag.mem_objs().len(),
            icfg_edges = writer.icfg.writer().edge_count(),
            loops = writer.icfg.loops().len(),
            "IR writer ready"
        );
        writer
    }

    #[inline]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn types(&self) -> &IdPool<TypeRef> {
        &self.types
    }

    pub fn values(&self) -> &IdPool<ValueRef> {
        &self.values
    }

    #[track_caller]
    pub fn type_id(&mut self, ty: TypeRef) -> Result<usize, WriteError> {
        if !self.ir.types.contains(ty) {
            return Err(WriteError::invariant(Violation::DanglingHandle {
                kind: "type",
                index: ty.raw(),
                len: self.ir.types.len(),
            }));
        }
        Ok(self.types.id(ty))
    }

    #[track_caller]
    pub fn value_id(&mut self, value: ValueRef) -> Result<usize, WriteError> {
        if !self.ir.values.contains(value) {
            return Err(WriteError::invariant(Violation::DanglingHandle {
                kind: "value",
                index: value.raw(),
                len: self.ir.values.len(),
            }));
        }
        Ok(self.values.id(value))
    }

    #[track_caller]
    pub fn pag_edge_id(&mut self, stmt: StmtRef) -> Result<usize, WriteError> {
        self.pag.edge_id(stmt)
    }

    #[track_caller]
    pub fn icfg_edge_id(&mut self, edge: IcfgEdgeRef) -> Result<usize, WriteError> {
        self.icfg.edge_id(edge)
    }

    #[track_caller]
    pub fn chg_edge_id(&mut self, edge: ChEdgeRef) -> Result<usize, WriteError> {
        self.chg.edge_id(edge)
    }

    #[track_caller]
    pub fn loop_id(&mut self, lp: LoopRef) -> Result<usize, WriteError> {
        self.icfg.loop_id(lp)
    }

    #[track_caller]
    pub fn mem_obj_id(&mut self, mem: MemObjRef) -> Result<usize, WriteError> {
        self.pag.mem_obj_id(mem)
    }

    /// Encode `value` by reference and store it under `name`.
    pub(crate) fn field<T: Encode + ?Sized>(
        &mut self,
        obj: &mut Map<String, Value>,
        name: &str,
        value: &T,
    ) -> Result<(), WriteError> {
        let encoded = value.encode(self)?;
        obj.insert(name.to_owned(), encoded);
        Ok(())
    }

    /// Build the whole document.
    ///
    /// The first invariant violation aborts the build; no partial document
    /// is returned.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn to_document(&mut self) -> Result<Value, WriteError> {
        let ir = self.ir;

        let pag_nodes = self.node_map(&ir.pag.graph, Self::var_content)?;
        let icfg_nodes = self.node_map(&ir.icfg.graph, Self::icfg_node_content)?;
        let chg_nodes = match ir.chg.graph() {
            Some(graph) => Some(self.node_map(graph, Self::ch_node_content)?),
            None => None,
        };
        let global_node = self.field_value(&ir.icfg.global_node)?;
        let node_loops = self.node_loops()?;
        let module = self.module_content(&ir.module)?;
        let symbols = self.symbol_table_content(&ir.symbols)?;

        let mut drained = Drained::new();
        let mut round = 0;
        loop {
            round += 1;
            let before = drained.total();
            self.drain_round(&mut drained)?;
            let added = drained.total() - before;
            debug!(round, added, "pool drain round");
            if added == 0 {
                break;
            }
        }

        let mut pag = graph_section(&ir.pag.graph, pag_nodes, drained.pag_edges);
        pag.insert("memObjs".to_owned(), Value::Array(drained.mem_objs));

        let mut icfg = graph_section(&ir.icfg.graph, icfg_nodes, drained.icfg_edges);
        icfg.insert("globalNode".to_owned(), global_node);
        icfg.insert("nodeLoops".to_owned(), Value::Object(node_loops));
        icfg.insert("loops".to_owned(), Value::Array(drained.loops));

        let chg = match (ir.chg.graph(), chg_nodes) {
            (Some(graph), Some(nodes)) => {
                Value::Object(graph_section(graph, nodes, drained.chg_edges))
            }
            _ => Value::Null,
        };

        let mut root = Map::new();
        root.insert("pag".to_owned(), Value::Object(pag));
        root.insert("icfg".to_owned(), Value::Object(icfg));
        root.insert("chg".to_owned(), chg);
        root.insert("module".to_owned(), module);
        root.insert("symbolTable".to_owned(), symbols);
        root.insert("types".to_owned(), Value::Array(drained.types));
        root.insert("values".to_owned(), Value::Array(drained.values));

        debug!(
            rounds = round,
            types = self.types.len(),
            values = self.values.len(),
            "document complete"
        );
        Ok(Value::Object(root))
    }

    /// Serialize the document to a string, compact or pretty per config.
    pub fn generate_json_string(&mut self) -> Result<String, WriteError> {
        let document = self.to_document()?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(text)
    }

    /// Serialize the document into `out`.
    pub fn write_to<W: io::Write>(&mut self, mut out: W) -> Result<(), WriteError> {
        let document = self.to_document()?;
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut out, &document)?;
        } else {
            serde_json::to_writer(&mut out, &document)?;
        }
        out.flush()?;
        Ok(())
    }

    fn field_value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<Value, WriteError> {
        value.encode(self)
    }

    /// Content of every node in the node collection, keyed by id.
    fn node_map<N, E>(
        &mut self,
        graph: &'ir Graph<N, E>,
        content: fn(&mut Self, &'ir N) -> Result<Value, WriteError>,
    ) -> Result<Map<String, Value>, WriteError>
    where
        N: GraphNode<Edge = E>,
        E: GraphEdge<Node = N>,
    {
        let mut map = Map::new();
        for (id, _, node) in graph.iter() {
            let value = content(self, node)?;
            map.insert(id.raw().to_string(), value);
        }
        Ok(map)
    }

    /// Loop ids per ICFG node, for nodes inside at least one loop.
    fn node_loops(&mut self) -> Result<Map<String, Value>, WriteError> {
        let ir = self.ir;
        let icfg = &ir.icfg;
        let mut map = Map::new();
        for (id, handle, _) in icfg.graph.iter() {
            let loops = icfg.loops_of(handle);
            if loops.is_empty() {
                continue;
            }
            let value = loops.encode(self)?;
            map.insert(id.raw().to_string(), value);
        }
        Ok(map)
    }

    /// Emit content for every pool entry not yet emitted.
    fn drain_round(&mut self, out: &mut Drained) -> Result<(), WriteError> {
        let ir = self.ir;

        while out.pag_edges.len() < self.pag.writer().edge_count() {
            let stmt = edge_at(self.pag.writer(), out.pag_edges.len() + 1)?;
            let content = self.stmt_content(stmt)?;
            out.pag_edges.push(content);
        }

        while out.mem_objs.len() <= self.pag.mem_objs().len() {
            let mem = pooled(self.pag.mem_objs(), out.mem_objs.len())?;
            let obj = ir
                .pag
                .mem_objs
                .get(mem)
                .ok_or_else(|| dangling("memory object", mem.raw(), ir.pag.mem_objs.len()))?;
            let content = self.mem_obj_content(obj)?;
            out.mem_objs.push(content);
        }

        while out.icfg_edges.len() < self.icfg.writer().edge_count() {
            let edge = edge_at(self.icfg.writer(), out.icfg_edges.len() + 1)?;
            let content = self.icfg_edge_content(edge)?;
            out.icfg_edges.push(content);
        }

        while out.loops.len() <= self.icfg.loops().len() {
            let lp = pooled(self.icfg.loops(), out.loops.len())?;
            let body = ir
                .icfg
                .loops
                .get(lp)
                .ok_or_else(|| dangling("loop", lp.raw(), ir.icfg.loops.len()))?;
            let content = self.loop_content(body)?;
            out.loops.push(content);
        }

        while let Some(writer) = self.chg.writer() {
            if out.chg_edges.len() >= writer.edge_count() {
                break;
            }
            let edge = edge_at(writer, out.chg_edges.len() + 1)?;
            let content = self.ch_edge_content(edge)?;
            out.chg_edges.push(content);
        }

        while out.types.len() <= self.types.len() {
            let ty = pooled(&self.types, out.types.len())?;
            let desc = ir
                .types
                .get(ty)
                .ok_or_else(|| dangling("type", ty.raw(), ir.types.len()))?;
            let content = self.type_content(desc)?;
            out.types.push(content);
        }

        while out.values.len() <= self.values.len() {
            let value = pooled(&self.values, out.values.len())?;
            let desc = ir
                .values
                .get(value)
                .ok_or_else(|| dangling("value", value.raw(), ir.values.len()))?;
            let content = self.value_content(desc)?;
            out.values.push(content);
        }

        Ok(())
    }
}

/// Edge with pool id `id`, resolved to the edge itself.
fn edge_at<'ir, N, E>(writer: &GraphWriter<'ir, N, E>, id: usize) -> Result<&'ir E, WriteError>
where
    N: GraphNode<Edge = E>,
    E: GraphEdge<Node = N>,
{
    let graph = writer.graph();
    let handle = writer.edge_at(id)?.ok_or_else(|| {
        WriteError::invariant(Violation::IdOutOfRange {
            pool: "edge",
            id,
            len: writer.edge_count(),
        })
    })?;
    graph
        .edge(handle)
        .ok_or_else(|| dangling("edge", handle.raw(), graph.edge_slots()))
}

/// Handle with id `id` in an id-indexed pool (`id >= 1`).
#[track_caller]
fn pooled<T: Copy + Eq + Hash>(pool: &IdPool<T>, id: usize) -> Result<T, WriteError> {
    pool.ptr_for(id)?.ok_or_else(|| {
        WriteError::invariant(Violation::IdOutOfRange {
            pool: "reserved",
            id,
            len: pool.len(),
        })
    })
}

#[track_caller]
fn dangling(kind: &'static str, index: u32, len: usize) -> WriteError {
    WriteError::invariant(Violation::DanglingHandle { kind, index, len })
}

/// The shared `nodeNum` / `edgeNum` / `nodes` / `edges` block of a graph.
fn graph_section<N, E>(
    graph: &Graph<N, E>,
    nodes: Map<String, Value>,
    edges: Vec<Value>,
) -> Map<String, Value>
where
    N: GraphNode<Edge = E>,
    E: GraphEdge<Node = N>,
{
    let mut section = Map::new();
    section.insert("nodeNum".to_owned(), Value::from(graph.node_num()));
    section.insert("edgeNum".to_owned(), Value::from(graph.edge_num()));
    section.insert("nodes".to_owned(), Value::Object(nodes));
    section.insert("edges".to_owned(), Value::Array(edges));
    section
}

/// Write `ir` to a string.
pub fn write_ir(ir: &Ir, config: WriterConfig) -> Result<String, WriteError> {
    IrWriter::new(ir, config).generate_json_string()
}

/// Write `ir` into `out`.
pub fn write_ir_to<W: io::Write>(
    ir: &Ir,
    config: WriterConfig,
    out: W,
) -> Result<(), WriteError> {
    IrWriter::new(ir, config).write_to(out)
}
