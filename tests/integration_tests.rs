use dlc::analyzer::{SemanticVisitor, Ty};
use dlc::codegen::Codegen;
use dlc::config::{CompileOptions, PointerStyle};
use dlc::error::{CompileError, GenerationError, LexError};
use dlc::parser::*;

fn compile(input: &str) -> String {
    dlc::compile(input, &CompileOptions::default()).unwrap()
}

fn compile_opaque(input: &str) -> String {
    let options = CompileOptions {
        pointer_style: PointerStyle::Opaque,
        ..CompileOptions::default()
    };
    dlc::compile(input, &options).unwrap()
}

/// Lines of the body of `@name`, without the `define` line and closing brace.
fn function_body(ir: &str, name: &str) -> Vec<String> {
    let header = format!("define i32 @{}(", name);
    ir.lines()
        .skip_while(|l| !l.starts_with(&header))
        .skip(1)
        .take_while(|l| *l != "}")
        .map(|l| l.to_string())
        .collect()
}

const PRINTF: &str =
    "call i32 (i8*, ...) @printf(i8* getelementptr([4 x i8], [4 x i8]* @.formatstr, i32 0, i32 0)";

#[test]
fn print_constant_module() {
    assert_eq!(
        compile("{ print(3) }"),
        format!(
            "declare i32 @printf(i8*, ...) nounwind
declare i32 @scanf(i8*, ...)
@.formatstr = internal constant [4 x i8] c\"%d\\0A\\00\"

define i32 @main() {{
entry.0:
  %tmp.1 = {}, i32 3)
  ret i32 0
}}
",
            PRINTF
        )
    );
}

#[test]
fn arithmetic() {
    let ir = compile("{ print(5 + 7 * 2 - 12 / 6) }");
    assert_eq!(
        function_body(&ir, "main"),
        vec![
            "entry.0:".to_string(),
            "  %tmp.1 = mul i32 7, 2".to_string(),
            "  %tmp.2 = add i32 5, %tmp.1".to_string(),
            "  %tmp.3 = udiv i32 12, 6".to_string(),
            "  %tmp.4 = sub i32 %tmp.2, %tmp.3".to_string(),
            format!("  %tmp.5 = {}, i32 %tmp.4)", PRINTF),
            "  ret i32 0".to_string(),
        ]
    );
}

#[test]
fn variables_are_zero_initialized_stack_slots() {
    let ir = compile("int a, c; { c = 6; print(a + c) }");
    assert_eq!(
        function_body(&ir, "main"),
        vec![
            "entry.0:".to_string(),
            "  %a = alloca i32".to_string(),
            "  store i32 0, i32* %a".to_string(),
            "  %c = alloca i32".to_string(),
            "  store i32 0, i32* %c".to_string(),
            "  store i32 6, i32* %c".to_string(),
            "  %tmp.1 = load i32, i32* %a".to_string(),
            "  %tmp.2 = load i32, i32* %c".to_string(),
            "  %tmp.3 = add i32 %tmp.1, %tmp.2".to_string(),
            format!("  %tmp.4 = {}, i32 %tmp.3)", PRINTF),
            "  ret i32 0".to_string(),
        ]
    );
}

#[test]
fn arrays() {
    let ir = compile("int d[10], e; { d[5] = 7; e = d[e + 1]; print(e) }");
    assert_eq!(
        function_body(&ir, "main"),
        vec![
            "entry.0:".to_string(),
            "  %d = alloca [10 x i32]".to_string(),
            "  %e = alloca i32".to_string(),
            "  store i32 0, i32* %e".to_string(),
            "  %tmp.1 = getelementptr [10 x i32], [10 x i32]* %d, i32 0, i32 5".to_string(),
            "  store i32 7, i32* %tmp.1".to_string(),
            "  %tmp.2 = load i32, i32* %e".to_string(),
            "  %tmp.3 = add i32 %tmp.2, 1".to_string(),
            "  %tmp.4 = getelementptr [10 x i32], [10 x i32]* %d, i32 0, i32 %tmp.3".to_string(),
            "  %tmp.5 = load i32, i32* %tmp.4".to_string(),
            "  store i32 %tmp.5, i32* %e".to_string(),
            "  %tmp.6 = load i32, i32* %e".to_string(),
            format!("  %tmp.7 = {}, i32 %tmp.6)", PRINTF),
            "  ret i32 0".to_string(),
        ]
    );
}

#[test]
fn read_statement() {
    let ir = compile("int f; { read(f); print(f) }");
    assert!(ir.contains(
        "  %tmp.1 = call i32 (i8*, ...) @scanf(i8* getelementptr([4 x i8], [4 x i8]* @.formatstr, i32 0, i32 0), i32* %f)\n"
    ));
    assert!(ir.contains("  %tmp.2 = load i32, i32* %f\n"));
}

#[test]
fn if_else() {
    let ir = compile("int q; { q = 5; if (q > 1) { print(q) } else { print(0) } }");
    assert_eq!(
        function_body(&ir, "main"),
        vec![
            "entry.0:".to_string(),
            "  %q = alloca i32".to_string(),
            "  store i32 0, i32* %q".to_string(),
            "  store i32 5, i32* %q".to_string(),
            "  %tmp.1 = load i32, i32* %q".to_string(),
            "  %tmp.2 = icmp sgt i32 %tmp.1, 1".to_string(),
            "  br i1 %tmp.2, label %if.true.1, label %if.false.2".to_string(),
            "if.true.1:".to_string(),
            "  %tmp.3 = load i32, i32* %q".to_string(),
            format!("  %tmp.4 = {}, i32 %tmp.3)", PRINTF),
            "  br label %if.end.3".to_string(),
            "if.false.2:".to_string(),
            format!("  %tmp.5 = {}, i32 0)", PRINTF),
            "  br label %if.end.3".to_string(),
            "if.end.3:".to_string(),
            "  ret i32 0".to_string(),
        ]
    );
}

#[test]
fn if_without_else_still_has_false_block() {
    let ir = compile("{ if (1 < 2) { print(1) }; if (2 < 1) { print(2) } }");
    let body = function_body(&ir, "main");
    for label in [
        "if.true.1:",
        "if.false.2:",
        "if.end.3:",
        "if.true.4:",
        "if.false.5:",
        "if.end.6:",
    ] {
        assert!(body.contains(&label.to_string()), "missing {}", label);
    }
    assert!(body.contains(&"  br i1 %tmp.3, label %if.true.4, label %if.false.5".to_string()));
}

#[test]
fn relational_operators() {
    let cases = [
        ("==", "eq"),
        ("!=", "ne"),
        ("<", "slt"),
        ("<=", "sle"),
        (">", "sgt"),
        (">=", "sge"),
    ];
    for (op, predicate) in cases {
        let ir = compile(&format!("{{ if (3 {} 4) {{ print(1) }} }}", op));
        assert!(
            ir.contains(&format!("  %tmp.1 = icmp {} i32 3, 4\n", predicate)),
            "{} should lower to icmp {}",
            op,
            predicate
        );
    }
}

#[test]
fn while_loop() {
    let ir = compile("int x; { x = 1; while (x <= 10) { x = x + 1 } }");
    assert_eq!(
        function_body(&ir, "main"),
        vec![
            "entry.0:".to_string(),
            "  %x = alloca i32".to_string(),
            "  store i32 0, i32* %x".to_string(),
            "  store i32 1, i32* %x".to_string(),
            "  br label %while.loop.1".to_string(),
            "while.loop.1:".to_string(),
            "  %tmp.1 = load i32, i32* %x".to_string(),
            "  %tmp.2 = icmp sle i32 %tmp.1, 10".to_string(),
            "  br i1 %tmp.2, label %while.body.2, label %while.end.3".to_string(),
            "while.body.2:".to_string(),
            "  %tmp.3 = load i32, i32* %x".to_string(),
            "  %tmp.4 = add i32 %tmp.3, 1".to_string(),
            "  store i32 %tmp.4, i32* %x".to_string(),
            "  br label %while.loop.1".to_string(),
            "while.end.3:".to_string(),
            "  ret i32 0".to_string(),
        ]
    );
}

#[test]
fn functions_precede_main_and_share_counters() {
    let ir = compile("foo(x, y); { return(x + y) } { print(foo(1, 2)) }");
    assert!(ir.find("define i32 @foo(").unwrap() < ir.find("define i32 @main()").unwrap());
    assert_eq!(
        function_body(&ir, "foo"),
        vec![
            "entry.0:".to_string(),
            "  %tmp.1 = add i32 %x, %y".to_string(),
            "  ret i32 %tmp.1".to_string(),
            "  ret i32 0".to_string(),
        ]
    );
    assert!(ir.contains("define i32 @foo(i32 %x, i32 %y) {\n"));
    assert_eq!(
        function_body(&ir, "main"),
        vec![
            "entry.0:".to_string(),
            "  %tmp.2 = call i32 @foo(i32 1, i32 2)".to_string(),
            format!("  %tmp.3 = {}, i32 %tmp.2)", PRINTF),
            "  ret i32 0".to_string(),
        ]
    );
}

#[test]
fn names_spelled_entry_do_not_clash_with_entry_block() {
    let ir = compile("int entry; { entry = 4; print(entry) }");
    let main = function_body(&ir, "main");
    assert_eq!(main[0], "entry.0:");
    assert!(main.contains(&"  %entry = alloca i32".to_string()));
    assert!(!ir.lines().any(|l| l == "entry:"));

    let ir = compile("twice(entry); { return(entry * 2) } { print(twice(3)) }");
    assert!(ir.contains("define i32 @twice(i32 %entry) {\n"));
    let body = function_body(&ir, "twice");
    assert_eq!(body[0], "entry.0:");
    assert!(body.contains(&"  %tmp.1 = mul i32 %entry, 2".to_string()));
}

#[test]
fn function_without_arguments_and_with_locals() {
    let ir = compile("five(); int y; { y = 5; return(y) } { print(five()) }");
    assert!(ir.contains("define i32 @five() {\n"));
    assert_eq!(
        function_body(&ir, "five"),
        vec![
            "entry.0:".to_string(),
            "  %y = alloca i32".to_string(),
            "  store i32 0, i32* %y".to_string(),
            "  store i32 5, i32* %y".to_string(),
            "  %tmp.1 = load i32, i32* %y".to_string(),
            "  ret i32 %tmp.1".to_string(),
            "  ret i32 0".to_string(),
        ]
    );
    assert!(ir.contains("  %tmp.2 = call i32 @five()\n"));
}

#[test]
fn recursive_function() {
    let ir = compile(
        "
factorial(n);
{
    if (n == 0) { return(1) }
    else { return(n * factorial(n - 1)) }
}
int x;
{
    x = 1;
    while (x <= 10) {
        print(factorial(x));
        x = x + 1
    }
}
",
    );
    let body = function_body(&ir, "factorial");
    assert!(body.contains(&"  %tmp.1 = icmp eq i32 %n, 0".to_string()));
    assert!(body.contains(&"  ret i32 1".to_string()));
    assert!(body.contains(&"  %tmp.2 = sub i32 %n, 1".to_string()));
    assert!(body.contains(&"  %tmp.3 = call i32 @factorial(i32 %tmp.2)".to_string()));
    assert!(body.contains(&"  %tmp.4 = mul i32 %n, %tmp.3".to_string()));
    assert!(body.contains(&"  ret i32 %tmp.4".to_string()));

    let main = function_body(&ir, "main");
    assert!(main.contains(&"while.loop.4:".to_string()));
    assert!(main.contains(&"  %x = alloca i32".to_string()));
}

#[test]
fn fallthrough_return_can_be_disabled() {
    let options = CompileOptions {
        fallthrough_return: false,
        ..CompileOptions::default()
    };
    let ir = dlc::compile("foo(x); { return(x) } { print(foo(1)) }", &options).unwrap();
    assert_eq!(
        function_body(&ir, "foo"),
        vec!["entry.0:".to_string(), "  ret i32 %x".to_string()]
    );
    assert!(function_body(&ir, "main").ends_with(&["  ret i32 0".to_string()]));
}

#[test]
fn opaque_pointers() {
    let ir = compile_opaque("int d[3], f; { d[1] = 2; read(f); print(d[1]) }");
    assert!(ir.starts_with(
        "declare i32 @printf(ptr, ...) nounwind\ndeclare i32 @scanf(ptr, ...)\n"
    ));
    assert!(ir.contains("  store i32 0, ptr %f\n"));
    assert!(ir.contains("  %tmp.1 = getelementptr [3 x i32], ptr %d, i32 0, i32 1\n"));
    assert!(ir.contains("  store i32 2, ptr %tmp.1\n"));
    assert!(ir.contains("  %tmp.2 = call i32 (ptr, ...) @scanf(ptr @.formatstr, ptr %f)\n"));
    assert!(ir.contains("  %tmp.4 = load i32, ptr %tmp.3\n"));
    assert!(ir.contains("  %tmp.5 = call i32 (ptr, ...) @printf(ptr @.formatstr, i32 %tmp.4)\n"));
    assert!(!ir.contains("i32*"));
}

#[test]
fn writes_to_arguments_are_rejected() {
    assert_eq!(
        dlc::compile(
            "foo(x); { x = 1; return(x) } { print(foo(1)) }",
            &CompileOptions::default()
        ),
        Err(CompileError::Generation(
            GenerationError::InvalidAssignTarget("x".to_string())
        ))
    );
    assert_eq!(
        dlc::compile(
            "foo(x); { read(x); return(x) } { print(foo(1)) }",
            &CompileOptions::default()
        ),
        Err(CompileError::Generation(
            GenerationError::InvalidAssignTarget("x".to_string())
        ))
    );
}

#[test]
fn comparison_operand_is_widened() {
    let inner = Expr::new(ExprKind::RelOp(
        RelOpKind::LessThan,
        Box::new(Expr::integer(1)),
        Box::new(Expr::integer(2)),
    ));
    let cond = Expr::new(ExprKind::RelOp(
        RelOpKind::Equal,
        Box::new(inner),
        Box::new(Expr::integer(1)),
    ));
    let mut program = Program {
        declarations: None,
        body: Block(vec![Stmt::While(cond, Block::default())]),
    };
    SemanticVisitor::new().visit_program(&mut program).unwrap();

    let ir = Codegen::new(CompileOptions::default())
        .generate(&program)
        .unwrap();
    assert!(ir.contains(
        "  %tmp.1 = icmp slt i32 1, 2\n  %tmp.2 = zext i1 %tmp.1 to i32\n  %tmp.3 = icmp eq i32 %tmp.2, 1\n"
    ));
}

#[test]
fn unannotated_trees_are_rejected() {
    let program = Program {
        declarations: None,
        body: Block(vec![Stmt::Print(Expr::integer(1))]),
    };
    assert_eq!(
        Codegen::new(CompileOptions::default()).generate(&program),
        Err(GenerationError::MissingType("Integer(1)".to_string()))
    );

    let mut var = Expr::variable("x");
    var.ty = Some(Ty::Int);
    let program = Program {
        declarations: None,
        body: Block(vec![Stmt::Print(var)]),
    };
    assert_eq!(
        Codegen::new(CompileOptions::default()).generate(&program),
        Err(GenerationError::UnresolvedSymbol("x".to_string()))
    );

    let mut index = Expr::integer(0);
    index.ty = Some(Ty::Int);
    let mut value = Expr::integer(1);
    value.ty = Some(Ty::Int);
    let program = Program {
        declarations: None,
        body: Block(vec![Stmt::Assign(Assign::new(
            LValue::ArrayIndex(ArrayIndex::new("d", index)),
            value,
        ))]),
    };
    assert_eq!(
        Codegen::new(CompileOptions::default()).generate(&program),
        Err(GenerationError::UnknownArraySize("d".to_string()))
    );
}

#[test]
fn errors_stop_before_generation() {
    assert!(matches!(
        dlc::compile("{ print(a) }", &CompileOptions::default()),
        Err(CompileError::Semantic(_))
    ));
    assert!(matches!(
        dlc::compile("{ print(1 }", &CompileOptions::default()),
        Err(CompileError::Parse(_))
    ));
}

#[test]
fn illegal_characters_are_skipped() {
    assert_eq!(compile("{ print(3) $ }"), compile("{ print(3) }"));
}

#[test]
fn repl_renders_tree_or_error() {
    assert_eq!(
        dlc::repl::eval_line("int b; { print(b) }"),
        Ok("Program(Declarations(VariableDeclarations(INT, Variable(b))), Block(Print(Variable(b))))".to_string())
    );
    assert_eq!(
        dlc::repl::eval_line("{ print(a) }"),
        Err("semantic error: undeclared variable: a".to_string())
    );
    assert_eq!(
        dlc::repl::eval_line("{ print(1) $ }"),
        Ok("warning: line 1: illegal character '$'\nProgram(Block(Print(Integer(1))))".to_string())
    );
}

#[test]
fn skipped_characters_are_returned_to_callers() {
    let (program, errors) = dlc::analyze_with_errors("int a;\n{ a = 1 # ; print(a) }").unwrap();
    assert_eq!(
        program.to_string(),
        "Program(Declarations(VariableDeclarations(INT, Variable(a))), Block(Assign(Variable(a), Integer(1)), Print(Variable(a))))"
    );
    assert_eq!(
        errors,
        vec![LexError::IllegalCharacter {
            character: '#',
            line: 2
        }]
    );

    let (_, errors) = dlc::parse_with_errors("{ print(1) }").unwrap();
    assert!(errors.is_empty());
}
