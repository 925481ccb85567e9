use tracing::debug;

use crate::{
    error::SemanticError,
    parser::{
        ArrayIndex, Assign, Block, Declaration, Declarations, Expr, ExprKind, FunctionDeclaration,
        LValue, Program, Stmt, TypeSpecifier, VarDef, Variable, VariableDeclarations,
    },
};

use super::{Reach, Resolution, Symbol, SymbolKind, SymbolTable, Ty};

type SemanticResult<T> = Result<T, SemanticError>;

/// Names the generated module defines itself.
const RESERVED_FUNCTIONS: [&str; 3] = ["main", "printf", "scanf"];

/// Resolves names and infers a type for every expression, annotating the tree
/// in place. Stops at the first error.
///
/// Variables and arrays are only visible in the scope that declares them, so
/// a function body cannot see the program's variables. Functions resolve
/// through every enclosing scope, which is what makes calls and recursion
/// work.
#[derive(Debug, Default)]
pub struct SemanticVisitor {
    symbol_table: SymbolTable,
}

impl SemanticVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit_program(&mut self, program: &mut Program) -> SemanticResult<()> {
        self.symbol_table.enter_scope();
        if let Some(declarations) = program.declarations.as_mut() {
            self.visit_declarations(declarations)?;
        }
        self.visit_block(&mut program.body)?;
        self.symbol_table.exit_scope();

        debug!("semantic analysis finished");
        Ok(())
    }

    fn visit_declarations(&mut self, declarations: &mut Declarations) -> SemanticResult<()> {
        for declaration in declarations.0.iter_mut() {
            match declaration {
                Declaration::Variables(v) => self.visit_variable_declarations(v)?,
                Declaration::Function(f) => self.visit_function_declaration(f)?,
            }
        }
        Ok(())
    }

    fn declare(&self, name: &str) -> SemanticResult<()> {
        if self.symbol_table.check_local(name) {
            return Err(SemanticError::Redeclared(name.to_string()));
        }
        Ok(())
    }

    fn visit_variable_declarations(
        &mut self,
        declarations: &mut VariableDeclarations,
    ) -> SemanticResult<()> {
        let ty = match declarations.specifier {
            TypeSpecifier::Int => Ty::Int,
        };
        for var in declarations.variables.iter() {
            self.declare(var.name())?;
            match var {
                VarDef::Variable(name) => self.symbol_table.add_var_symbol(name, ty),
                VarDef::Array(name, size) => self.symbol_table.add_array_symbol(name, ty, *size),
            }
        }
        Ok(())
    }

    fn visit_function_declaration(&mut self, func: &mut FunctionDeclaration) -> SemanticResult<()> {
        if RESERVED_FUNCTIONS.contains(&func.name.as_str()) {
            return Err(SemanticError::Redeclared(func.name.clone()));
        }
        self.declare(&func.name)?;
        self.symbol_table
            .add_func_symbol(&func.name, func.params().len());

        self.symbol_table.enter_scope();
        for param in func.params() {
            self.declare(param)?;
            self.symbol_table.add_arg_symbol(param, Ty::Int);
        }
        if let Some(locals) = func.locals.as_mut() {
            self.visit_variable_declarations(locals)?;
        }
        self.visit_block(&mut func.body)?;
        self.symbol_table.exit_scope();

        debug!(name = %func.name, params = func.params().len(), "analyzed function");
        Ok(())
    }

    fn visit_block(&mut self, block: &mut Block) -> SemanticResult<()> {
        for stmt in block.0.iter_mut() {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) -> SemanticResult<()> {
        match stmt {
            Stmt::Assign(assign) => {
                self.visit_assign(assign)?;
            }
            Stmt::Print(expr) | Stmt::Return(expr) => {
                self.visit_expr(expr)?;
            }
            Stmt::Read(var) => {
                self.visit_variable(var)?;
            }
            Stmt::If(cond, block, else_block) => {
                self.visit_condition(cond)?;
                self.visit_block(block)?;
                if let Some(b) = else_block {
                    self.visit_block(b)?;
                }
            }
            Stmt::While(cond, block) => {
                self.visit_condition(cond)?;
                self.visit_block(block)?;
            }
            Stmt::Block(block) => self.visit_block(block)?,
        };
        Ok(())
    }

    fn visit_condition(&mut self, cond: &mut Expr) -> SemanticResult<()> {
        match self.visit_expr(cond)? {
            Ty::Bool => Ok(()),
            t => Err(SemanticError::TypeCheck(format!(
                "condition should be 'bool', found '{}'",
                t
            ))),
        }
    }

    fn visit_assign(&mut self, assign: &mut Assign) -> SemanticResult<Ty> {
        let t1 = match &mut assign.target {
            LValue::Variable(v) => self.visit_variable(v)?,
            LValue::ArrayIndex(a) => self.visit_array_index(a)?,
        };
        let t2 = self.visit_expr(&mut assign.value)?;
        assign.target_ty = Some(t1);

        if t1 != Ty::Int || t2 != Ty::Int {
            return Err(SemanticError::TypeCheck(format!(
                "type of arguments to assignment should be 'int': {}",
                assign.target.name()
            )));
        }
        assign.ty = Some(Ty::Int);
        Ok(Ty::Int)
    }

    fn visit_expr(&mut self, expr: &mut Expr) -> SemanticResult<Ty> {
        let ty = match &mut expr.kind {
            ExprKind::Integer(_) => Ty::Int,
            ExprKind::Variable(v) => self.visit_variable(v)?,
            ExprKind::ArrayIndex(a) => self.visit_array_index(a)?,
            ExprKind::BinOp(kind, left, right) => {
                let t1 = self.visit_expr(left)?;
                let t2 = self.visit_expr(right)?;
                if t1 != Ty::Int || t2 != Ty::Int {
                    return Err(SemanticError::TypeCheck(format!(
                        "type of arguments to binary operator should be 'int': {}",
                        kind
                    )));
                }
                Ty::Int
            }
            ExprKind::RelOp(kind, left, right) => {
                let t1 = self.visit_expr(left)?;
                let t2 = self.visit_expr(right)?;
                if !t1.is_comparable() || !t2.is_comparable() {
                    return Err(SemanticError::TypeCheck(format!(
                        "types of arguments to relational operator should be 'int' or 'bool': {}",
                        kind
                    )));
                }
                Ty::Bool
            }
            ExprKind::FunctionCall(name, args) => {
                let count = args.as_ref().map_or(0, Vec::len);
                self.check_call(name, count)?;
                for arg in args.iter_mut().flatten() {
                    self.visit_expr(arg)?;
                }
                Ty::Int
            }
        };

        expr.ty = Some(ty);
        Ok(ty)
    }

    fn check_call(&self, name: &str, count: usize) -> SemanticResult<()> {
        match self
            .symbol_table
            .resolve(name, &[SymbolKind::Function], Reach::Enclosing)
        {
            Resolution::Found(Symbol::Function { args, .. }) if *args == count => Ok(()),
            _ => Err(SemanticError::UndeclaredFunction {
                name: name.to_string(),
                arguments: count,
            }),
        }
    }

    fn visit_variable(&mut self, var: &mut Variable) -> SemanticResult<Ty> {
        let resolution = self.symbol_table.resolve(
            &var.name,
            &[SymbolKind::Variable, SymbolKind::Argument],
            Reach::Local,
        );
        let Resolution::Found(symbol) = resolution else {
            return Err(SemanticError::UndeclaredVariable(var.name.clone()));
        };
        var.symbol = Some(symbol.clone());
        Ok(Ty::Int)
    }

    fn visit_array_index(&mut self, array: &mut ArrayIndex) -> SemanticResult<Ty> {
        let resolution = self
            .symbol_table
            .resolve(&array.name, &[SymbolKind::Array], Reach::Local);
        let Resolution::Found(symbol) = resolution else {
            return Err(SemanticError::UndeclaredVariable(array.name.clone()));
        };
        let Symbol::Array { ty, .. } = symbol else {
            return Err(SemanticError::UndeclaredVariable(array.name.clone()));
        };
        let ty = *ty;
        let symbol = symbol.clone();

        if self.visit_expr(&mut array.index)? != Ty::Int {
            return Err(SemanticError::TypeCheck(format!(
                "array index should be 'int': {}",
                array.name
            )));
        }
        array.symbol = Some(symbol);
        Ok(ty)
    }
}
