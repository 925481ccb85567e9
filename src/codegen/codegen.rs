use tracing::debug;

use crate::{
    analyzer::{Symbol, Ty},
    config::{CompileOptions, PointerStyle},
    error::GenerationError,
    parser::{
        ArrayIndex, Assign, BinOpKind, Block, Declaration, Expr, ExprKind, FunctionDeclaration,
        LValue, Program, RelOpKind, Stmt, VarDef, Variable, VariableDeclarations,
    },
};

type GenResult<T> = Result<T, GenerationError>;

/// DL identifiers cannot contain `.`, so no local or parameter can shadow it.
const ENTRY_LABEL: &str = "entry.0";

const FORMAT_STRING: &str = r#"@.formatstr = internal constant [4 x i8] c"%d\0A\00""#;

/// Lowers a type-checked [`Program`] to LLVM IR text.
///
/// Every local lives in a stack slot and is accessed with explicit loads and
/// stores. Temporaries and labels are numbered from one counter each and are
/// never reused, so one `Codegen` serves exactly one compilation.
pub struct Codegen {
    code: Vec<String>,
    reg_count: usize,
    label_count: usize,
    options: CompileOptions,
}

impl Codegen {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            code: vec![],
            reg_count: 0,
            label_count: 0,
            options,
        }
    }

    pub fn generate(mut self, program: &Program) -> GenResult<String> {
        self.gen_program(program)?;

        let mut ir = self.code.join("\n");
        ir.push('\n');
        debug!(
            temporaries = self.reg_count,
            labels = self.label_count,
            bytes = ir.len(),
            "code generation finished"
        );
        Ok(ir)
    }

    fn emit(&mut self, line: String) {
        self.code.push(format!("  {}", line));
    }

    fn emit_label(&mut self, label: &str) {
        self.code.push(format!("{}:", label));
    }

    fn new_temporary(&mut self) -> String {
        self.reg_count += 1;
        format!("%tmp.{}", self.reg_count)
    }

    fn new_label(&mut self, partial: &str) -> String {
        self.label_count += 1;
        format!("{}.{}", partial, self.label_count)
    }

    /// Spells a pointer to `pointee` in the configured style.
    fn ptr(&self, pointee: &str) -> String {
        match self.options.pointer_style {
            PointerStyle::Typed => format!("{}*", pointee),
            PointerStyle::Opaque => "ptr".to_string(),
        }
    }

    /// The callee type shared by `printf` and `scanf`.
    fn io_fn_type(&self) -> String {
        format!("i32 ({}, ...)", self.ptr("i8"))
    }

    fn format_string_arg(&self) -> String {
        match self.options.pointer_style {
            PointerStyle::Typed => {
                "i8* getelementptr([4 x i8], [4 x i8]* @.formatstr, i32 0, i32 0)".to_string()
            }
            PointerStyle::Opaque => "ptr @.formatstr".to_string(),
        }
    }

    fn gen_prologue(&mut self) {
        let i8_ptr = self.ptr("i8");
        self.code
            .push(format!("declare i32 @printf({}, ...) nounwind", i8_ptr));
        self.code.push(format!("declare i32 @scanf({}, ...)", i8_ptr));
        self.code.push(FORMAT_STRING.to_string());
    }

    fn gen_program(&mut self, program: &Program) -> GenResult<()> {
        self.gen_prologue();

        let mut globals = vec![];
        for declaration in program.declarations.iter().flat_map(|d| d.0.iter()) {
            match declaration {
                Declaration::Variables(v) => globals.push(v),
                Declaration::Function(f) => self.gen_function_declaration(f)?,
            }
        }

        self.code.push(String::new());
        self.code.push("define i32 @main() {".to_string());
        self.emit_label(ENTRY_LABEL);
        for v in globals {
            self.gen_variable_declarations(v);
        }
        self.gen_block(&program.body)?;
        self.emit("ret i32 0".to_string());
        self.code.push("}".to_string());
        Ok(())
    }

    fn gen_variable_declarations(&mut self, declarations: &VariableDeclarations) {
        for var in &declarations.variables {
            match var {
                VarDef::Variable(name) => {
                    self.emit(format!("%{} = alloca i32", name));
                    self.emit(format!("store i32 0, {} %{}", self.ptr("i32"), name));
                }
                VarDef::Array(name, size) => {
                    self.emit(format!("%{} = alloca [{} x i32]", name, size));
                }
            }
        }
    }

    fn gen_function_declaration(&mut self, func: &FunctionDeclaration) -> GenResult<()> {
        let params = func
            .params()
            .iter()
            .map(|p| format!("i32 %{}", p))
            .collect::<Vec<_>>()
            .join(", ");

        self.code.push(String::new());
        self.code
            .push(format!("define i32 @{}({}) {{", func.name, params));
        self.emit_label(ENTRY_LABEL);
        if let Some(locals) = &func.locals {
            self.gen_variable_declarations(locals);
        }
        self.gen_block(&func.body)?;
        if self.options.fallthrough_return {
            self.emit("ret i32 0".to_string());
        }
        self.code.push("}".to_string());

        let locals = func.locals.as_ref().map_or(0, |l| l.variables.len());
        debug!(name = %func.name, locals, "generated function");
        Ok(())
    }

    fn gen_block(&mut self, block: &Block) -> GenResult<()> {
        for stmt in &block.0 {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> GenResult<()> {
        match stmt {
            Stmt::Assign(assign) => self.gen_assign(assign),
            Stmt::Print(expr) => {
                let value = self.gen_int_operand(expr)?;
                let tmp = self.new_temporary();
                self.emit(format!(
                    "{} = call {} @printf({}, i32 {})",
                    tmp,
                    self.io_fn_type(),
                    self.format_string_arg(),
                    value
                ));
                Ok(())
            }
            Stmt::Read(var) => self.gen_read(var),
            Stmt::Return(expr) => {
                let value = self.gen_int_operand(expr)?;
                self.emit(format!("ret i32 {}", value));
                Ok(())
            }
            Stmt::If(cond, block, else_block) => self.gen_if(cond, block, else_block.as_ref()),
            Stmt::While(cond, block) => self.gen_while(cond, block),
            Stmt::Block(block) => self.gen_block(block),
        }
    }

    /// A store target must be a stack slot; arguments are plain SSA values.
    fn stack_slot(var: &Variable) -> GenResult<String> {
        match &var.symbol {
            Some(Symbol::Variable { .. }) => Ok(format!("%{}", var.name)),
            Some(_) => Err(GenerationError::InvalidAssignTarget(var.name.clone())),
            None => Err(GenerationError::UnresolvedSymbol(var.name.clone())),
        }
    }

    fn gen_assign(&mut self, assign: &Assign) -> GenResult<()> {
        let value = self.gen_int_operand(&assign.value)?;
        let address = match &assign.target {
            LValue::Variable(v) => Self::stack_slot(v)?,
            LValue::ArrayIndex(a) => self.gen_element_ptr(a)?,
        };
        self.emit(format!(
            "store i32 {}, {} {}",
            value,
            self.ptr("i32"),
            address
        ));
        Ok(())
    }

    fn gen_read(&mut self, var: &Variable) -> GenResult<()> {
        let slot = Self::stack_slot(var)?;
        let tmp = self.new_temporary();
        self.emit(format!(
            "{} = call {} @scanf({}, {} {})",
            tmp,
            self.io_fn_type(),
            self.format_string_arg(),
            self.ptr("i32"),
            slot
        ));
        Ok(())
    }

    fn gen_if(&mut self, cond: &Expr, block: &Block, else_block: Option<&Block>) -> GenResult<()> {
        let true_label = self.new_label("if.true");
        let false_label = self.new_label("if.false");
        let end_label = self.new_label("if.end");

        let c = self.gen_expr(cond)?;
        self.emit(format!(
            "br i1 {}, label %{}, label %{}",
            c, true_label, false_label
        ));

        self.emit_label(&true_label);
        self.gen_block(block)?;
        self.emit(format!("br label %{}", end_label));

        self.emit_label(&false_label);
        if let Some(b) = else_block {
            self.gen_block(b)?;
        }
        self.emit(format!("br label %{}", end_label));

        self.emit_label(&end_label);
        Ok(())
    }

    fn gen_while(&mut self, cond: &Expr, block: &Block) -> GenResult<()> {
        let loop_label = self.new_label("while.loop");
        let body_label = self.new_label("while.body");
        let end_label = self.new_label("while.end");

        self.emit(format!("br label %{}", loop_label));
        self.emit_label(&loop_label);
        let c = self.gen_expr(cond)?;
        self.emit(format!(
            "br i1 {}, label %{}, label %{}",
            c, body_label, end_label
        ));

        self.emit_label(&body_label);
        self.gen_block(block)?;
        self.emit(format!("br label %{}", loop_label));

        self.emit_label(&end_label);
        Ok(())
    }

    fn expr_ty(expr: &Expr) -> GenResult<Ty> {
        expr.ty
            .ok_or_else(|| GenerationError::MissingType(expr.to_string()))
    }

    /// Lowers `expr`, widening a comparison result to `i32`.
    fn gen_int_operand(&mut self, expr: &Expr) -> GenResult<String> {
        let value = self.gen_expr(expr)?;
        self.widen(value, Self::expr_ty(expr)?)
    }

    fn widen(&mut self, value: String, ty: Ty) -> GenResult<String> {
        if ty == Ty::Int {
            return Ok(value);
        }
        let tmp = self.new_temporary();
        self.emit(format!("{} = zext i1 {} to i32", tmp, value));
        Ok(tmp)
    }

    /// Lowers `expr` and returns the operand holding its value: a literal,
    /// an argument name, or a fresh temporary.
    fn gen_expr(&mut self, expr: &Expr) -> GenResult<String> {
        Self::expr_ty(expr)?;

        match &expr.kind {
            ExprKind::Integer(value) => Ok(value.to_string()),
            ExprKind::Variable(v) => self.gen_variable(v),
            ExprKind::ArrayIndex(a) => {
                let address = self.gen_element_ptr(a)?;
                let tmp = self.new_temporary();
                self.emit(format!(
                    "{} = load i32, {} {}",
                    tmp,
                    self.ptr("i32"),
                    address
                ));
                Ok(tmp)
            }
            ExprKind::BinOp(kind, left, right) => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                let opcode = match kind {
                    BinOpKind::Add => "add",
                    BinOpKind::Sub => "sub",
                    BinOpKind::Mul => "mul",
                    BinOpKind::Div => "udiv",
                };
                let tmp = self.new_temporary();
                self.emit(format!("{} = {} i32 {}, {}", tmp, opcode, l, r));
                Ok(tmp)
            }
            ExprKind::RelOp(kind, left, right) => self.gen_relop(*kind, left, right),
            ExprKind::FunctionCall(name, args) => {
                let mut operands = vec![];
                for arg in args.iter().flatten() {
                    operands.push(format!("i32 {}", self.gen_int_operand(arg)?));
                }
                let tmp = self.new_temporary();
                self.emit(format!(
                    "{} = call i32 @{}({})",
                    tmp,
                    name,
                    operands.join(", ")
                ));
                Ok(tmp)
            }
        }
    }

    fn gen_relop(&mut self, kind: RelOpKind, left: &Expr, right: &Expr) -> GenResult<String> {
        let mut l = self.gen_expr(left)?;
        let mut r = self.gen_expr(right)?;
        let (lt, rt) = (Self::expr_ty(left)?, Self::expr_ty(right)?);

        let operand_ty = if lt == rt {
            lt
        } else {
            l = self.widen(l, lt)?;
            r = self.widen(r, rt)?;
            Ty::Int
        };
        let predicate = match kind {
            RelOpKind::Equal => "eq",
            RelOpKind::NotEqual => "ne",
            RelOpKind::LessThan => "slt",
            RelOpKind::LessEqual => "sle",
            RelOpKind::GreaterThan => "sgt",
            RelOpKind::GreaterEqual => "sge",
        };
        let tmp = self.new_temporary();
        self.emit(format!(
            "{} = icmp {} {} {}, {}",
            tmp,
            predicate,
            operand_ty.ir_type(),
            l,
            r
        ));
        Ok(tmp)
    }

    fn gen_variable(&mut self, var: &Variable) -> GenResult<String> {
        match &var.symbol {
            Some(Symbol::Variable { .. }) => {
                let tmp = self.new_temporary();
                self.emit(format!(
                    "{} = load i32, {} %{}",
                    tmp,
                    self.ptr("i32"),
                    var.name
                ));
                Ok(tmp)
            }
            Some(Symbol::Argument { .. }) => Ok(format!("%{}", var.name)),
            _ => Err(GenerationError::UnresolvedSymbol(var.name.clone())),
        }
    }

    /// Emits the address computation for `array[index]`.
    fn gen_element_ptr(&mut self, array: &ArrayIndex) -> GenResult<String> {
        let Some(Symbol::Array { size, .. }) = &array.symbol else {
            return Err(GenerationError::UnknownArraySize(array.name.clone()));
        };
        let array_ty = format!("[{} x i32]", size);
        let index = self.gen_int_operand(&array.index)?;

        let tmp = self.new_temporary();
        self.emit(format!(
            "{} = getelementptr {}, {} %{}, i32 0, i32 {}",
            tmp,
            array_ty,
            self.ptr(&array_ty),
            array.name,
            index
        ));
        Ok(tmp)
    }
}
