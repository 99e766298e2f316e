//! The compilation unit and its query surface.
//!
//! A [`CompilationUnit`] is the owned result of one parse. It is never
//! shared or replaced behind the caller's back: parsing again produces a new
//! unit and the old one stays valid for as long as the caller keeps it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use ssl_ir::{FileId, NodeList, Procedure, Reference, SourceMap, StringPool, Variable};
use ssl_parse::ParsedModule;
use tracing::debug;

use crate::namespace::{LayoutError, Namespace, Scope};

/// One recorded mention of a symbol, with its file resolved to a path.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct XRef<'u> {
    pub line: u32,
    pub file: &'u Path,
}

/// Procedures, globals, the string space and the namespace layouts of one
/// script.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompilationUnit {
    procs: Vec<Procedure>,
    vars: Vec<Variable>,
    stringspace: StringPool,
    main: NodeList,
    sources: SourceMap,
    globals: Option<Namespace>,
    locals: Vec<Option<Namespace>>,
}

impl CompilationUnit {
    /// Take ownership of a parsed module and lay out its namespaces.
    pub fn new(module: ParsedModule) -> Self {
        let ParsedModule {
            procs,
            vars,
            stringspace,
            main,
            sources,
        } = module;

        let globals = Namespace::layout(&vars);
        let locals: Vec<_> = procs.iter().map(|p| Namespace::layout(&p.locals)).collect();
        debug!(
            global_bytes = globals.as_ref().map_or(0, Namespace::size),
            procs_with_locals = locals.iter().filter(|l| l.is_some()).count(),
            "namespaces laid out"
        );

        CompilationUnit {
            procs,
            vars,
            stringspace,
            main,
            sources,
            globals,
            locals,
        }
    }

    /// Number of named procedures; the top-level sequence is not counted.
    pub fn num_procs(&self) -> usize {
        self.procs.len()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn procs(&self) -> &[Procedure] {
        &self.procs
    }

    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn proc(&self, idx: usize) -> Option<&Procedure> {
        self.procs.get(idx)
    }

    pub fn var(&self, idx: usize) -> Option<&Variable> {
        self.vars.get(idx)
    }

    /// Parameter or local `var` of procedure `proc`.
    pub fn proc_var(&self, proc: usize, var: usize) -> Option<&Variable> {
        self.procs.get(proc)?.locals.get(var)
    }

    /// Statements outside any procedure.
    pub fn main(&self) -> &NodeList {
        &self.main
    }

    pub fn proc_name(&self, idx: usize) -> Option<&str> {
        self.proc(idx).map(|p| self.stringspace.lookup(p.name))
    }

    pub fn var_name(&self, idx: usize) -> Option<&str> {
        self.var(idx).map(|v| self.stringspace.lookup(v.name))
    }

    pub fn proc_var_name(&self, proc: usize, var: usize) -> Option<&str> {
        let procedure = self.procs.get(proc)?;
        procedure
            .locals
            .get(var)
            .map(|v| procedure.namelist.lookup(v.name))
    }

    /// Index of the procedure called `name`.
    pub fn find_proc(&self, name: &str) -> Option<usize> {
        let id = self.stringspace.find(name)?;
        self.procs.iter().position(|p| p.name == id)
    }

    /// Index of the global variable called `name`.
    pub fn find_var(&self, name: &str) -> Option<usize> {
        let id = self.stringspace.find(name)?;
        self.vars.iter().position(|v| v.name == id)
    }

    /// Size in bytes of the global namespace, or `-1` if there are no globals.
    pub fn namespace_size(&self) -> i64 {
        layout_size(self.globals.as_ref())
    }

    pub fn namespace(&self) -> Result<&[u8], LayoutError> {
        self.globals
            .as_ref()
            .map(Namespace::dump)
            .ok_or(LayoutError::Empty(Scope::Global))
    }

    /// Size in bytes of a procedure's namespace, or `-1` if it has no
    /// parameters or locals (or does not exist).
    pub fn proc_namespace_size(&self, proc: usize) -> i64 {
        layout_size(self.locals.get(proc).and_then(Option::as_ref))
    }

    pub fn proc_namespace(&self, proc: usize) -> Result<&[u8], LayoutError> {
        let idx = u32::try_from(proc).unwrap_or(u32::MAX);
        match self.locals.get(proc) {
            Some(Some(ns)) => Ok(ns.dump()),
            Some(None) => Err(LayoutError::Empty(Scope::Procedure(idx))),
            None => Err(LayoutError::UnknownProcedure(idx)),
        }
    }

    pub fn global_layout(&self) -> Option<&Namespace> {
        self.globals.as_ref()
    }

    pub fn proc_layout(&self, proc: usize) -> Option<&Namespace> {
        self.locals.get(proc)?.as_ref()
    }

    pub fn stringspace_size(&self) -> usize {
        self.stringspace.size()
    }

    /// NUL-terminated strings in interning order.
    pub fn stringspace(&self) -> &[u8] {
        self.stringspace.dump()
    }

    pub fn string_pool(&self) -> &StringPool {
        &self.stringspace
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn proc_refs(&self, idx: usize) -> Option<Vec<XRef<'_>>> {
        self.proc(idx).map(|p| self.xrefs(&p.references))
    }

    pub fn var_refs(&self, idx: usize) -> Option<Vec<XRef<'_>>> {
        self.var(idx).map(|v| self.xrefs(&v.references))
    }

    pub fn proc_var_refs(&self, proc: usize, var: usize) -> Option<Vec<XRef<'_>>> {
        self.proc_var(proc, var).map(|v| self.xrefs(&v.references))
    }

    fn xrefs(&self, refs: &[Reference]) -> Vec<XRef<'_>> {
        refs.iter()
            .map(|r| XRef {
                line: r.line,
                file: self.file(r.file),
            })
            .collect()
    }

    fn file(&self, id: FileId) -> &Path {
        self.sources.path(id).unwrap_or_else(|| Path::new(""))
    }
}

fn layout_size(ns: Option<&Namespace>) -> i64 {
    ns.map_or(-1, |ns| i64::try_from(ns.size()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests;
