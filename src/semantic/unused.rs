//! Unused local variable warnings

use crate::feedback::DiagCode;
use crate::semantic::context::CompileContext;
use crate::semantic::scope::ScopeId;

impl CompileContext {
    /// Warn about variables bound in `scope` that were never read. Called as
    /// block and argument scopes are left.
    pub(crate) fn test_symbols(&mut self, scope: ScopeId) {
        let mut findings = Vec::new();
        for &id in self.scopes.get(scope).declarations() {
            let decl = self.decls.get(id);
            let Some(var) = decl.as_variable() else {
                continue;
            };
            if var.is_read {
                continue;
            }
            let code = if var.is_written {
                DiagCode::UnusedAssignment
            } else {
                DiagCode::SymbolNeverUsed
            };
            findings.push((decl.pos, code, decl.name.clone()));
        }
        for (pos, code, name) in findings {
            self.diags.report(pos, code).arg(name);
        }
    }
}
