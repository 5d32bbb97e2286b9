//! Tests for rhizome-pyrite-backend-python.

use crate::{compile, Backend, CompileError, Options};
use rhizome_pyrite_ast::{
    BinaryOp, Decl, Else, Expr, Function, Ident, Program, Property, Stmt, UnaryOp,
    ValidationError,
};

fn quiet() -> Options {
    Options::default().with_line_numbers(false)
}

fn script(body: Vec<Stmt>) -> Program {
    Program::new(vec![Decl::Script(body)])
}

fn compile_script(body: Vec<Stmt>) -> String {
    compile(&script(body), quiet()).unwrap()
}

fn compile_expr(expr: Expr) -> String {
    let code = compile_script(vec![Stmt::expr(expr)]);
    code.trim_end().to_string()
}

/// A variable the resolver has seen defined.
fn var(name: &str, symbol: u32) -> Expr {
    Expr::ident(Ident::new(name, symbol).declared())
}

fn array(name: &str, symbol: u32) -> Expr {
    Expr::ident(
        Ident::new(name, symbol)
            .declared()
            .with_property(Property::Array),
    )
}

fn function(name: &str, symbol: u32, params: &[&str], body: Vec<Stmt>) -> Decl {
    let params = params
        .iter()
        .enumerate()
        .map(|(i, p)| Ident::new(*p, 100 + i as u32))
        .collect();
    Decl::Function(Function::new(Ident::new(name, symbol), params, body))
}

#[test]
fn test_literals() {
    assert_eq!(compile_expr(Expr::int(42)), "42");
    assert_eq!(compile_expr(Expr::float(2.5)), "2.5");
    assert_eq!(compile_expr(Expr::string("it's")), "'it\\'s'");
    assert_eq!(compile_expr(Expr::Logical(true)), "true");
}

#[test]
fn test_number_addition_folds() {
    let sum = Expr::binary(Expr::int(1), BinaryOp::Add, Expr::int(2));
    assert_eq!(compile_expr(sum), "3");

    let mixed = Expr::binary(Expr::float(1.5), BinaryOp::Add, Expr::int(2));
    assert_eq!(compile_expr(mixed), "3.5");

    // Only two literals fold
    let open = Expr::binary(var("n", 0), BinaryOp::Add, Expr::int(1));
    assert_eq!(compile_expr(open), "(n+1)");
}

#[test]
fn test_operators() {
    let a = || var("a", 0);
    let b = || var("b", 1);
    assert_eq!(compile_expr(Expr::binary(a(), BinaryOp::Sub, b())), "(a-b)");
    assert_eq!(compile_expr(Expr::binary(a(), BinaryOp::Mul, b())), "a * b");
    assert_eq!(compile_expr(Expr::binary(a(), BinaryOp::ElemPow, b())), "a ** b");
    assert_eq!(compile_expr(Expr::binary(a(), BinaryOp::Ne, b())), "a != b");
    assert_eq!(
        compile_expr(Expr::binary(a(), BinaryOp::ElemAnd, b())),
        "logical_and(a,b)"
    );
    assert_eq!(
        compile_expr(Expr::binary(a(), BinaryOp::LeftDiv, b())),
        "linsolve(a,b)"
    );
    assert_eq!(compile_expr(Expr::binary(a(), BinaryOp::AndAlso, b())), "a and b");
    assert_eq!(
        compile_expr(Expr::unary(UnaryOp::ElemNot, a())),
        "logical_not(a)"
    );
}

#[test]
fn test_nested_operators_keep_grouping() {
    let a = || var("a", 0);
    let b = || var("b", 1);
    let c = || var("c", 2);

    // (a < b) < c must not become a chained comparison
    let chain = Expr::binary(Expr::binary(a(), BinaryOp::Lt, b()), BinaryOp::Lt, c());
    assert_eq!(compile_expr(chain), "(a < b) < c");

    // a^b^c groups to the left
    let power = Expr::binary(Expr::binary(a(), BinaryOp::Pow, b()), BinaryOp::Pow, c());
    assert_eq!(compile_expr(power), "(a ** b) ** c");

    let negated = Expr::binary(Expr::unary(UnaryOp::Not, a()), BinaryOp::Eq, b());
    assert_eq!(compile_expr(negated), "(not a) == b");

    let inverted = Expr::unary(UnaryOp::Not, Expr::binary(a(), BinaryOp::Eq, b()));
    assert_eq!(compile_expr(inverted), "not (a == b)");

    let minus_power = Expr::binary(Expr::unary(UnaryOp::Neg, a()), BinaryOp::Pow, b());
    assert_eq!(compile_expr(minus_power), "(-a) ** b");

    // Grouped and helper forms are already self-contained
    let sum = Expr::binary(Expr::binary(a(), BinaryOp::Sub, b()), BinaryOp::Mul, c());
    assert_eq!(compile_expr(sum), "(a-b) * c");
}

#[test]
fn test_reserved_names_renamed_once() {
    let program = script(vec![
        Stmt::expr(Expr::ident(Ident::new("lambda", 7))),
        Stmt::expr(Expr::ident(Ident::new("lambda", 7))),
    ]);
    let mut backend = Backend::new(quiet());
    let first = backend.compile_program(&program).unwrap();
    let second = backend.compile_program(&program).unwrap();
    assert_eq!(first, vec!["lambda_\nlambda_".to_string()]);
    assert_eq!(first, second);
}

#[test]
fn test_subscript_ranges() {
    let x = || array("x", 0);
    let full = Expr::index(x(), vec![Expr::Range(vec![])]);
    assert_eq!(compile_expr(full), "x[:]");

    let pair = Expr::index(x(), vec![Expr::Range(vec![Expr::int(1), var("n", 1)])]);
    assert_eq!(compile_expr(pair), "x[1:n]");

    let stepped = Expr::index(
        x(),
        vec![Expr::Range(vec![Expr::int(1), Expr::int(2), Expr::int(10)])],
    );
    assert_eq!(compile_expr(stepped), "x[1:10:2]");
}

#[test]
fn test_value_range() {
    let arange = Expr::Arange(vec![Expr::int(1), Expr::int(2), Expr::int(9)]);
    assert_eq!(compile_expr(arange), "arange(1,2,9)");
}

#[test]
fn test_opaque_indexing_uses_take() {
    let y = Expr::ident(Ident::new("y", 0).declared().with_property(Property::Opaque));
    assert_eq!(compile_expr(Expr::index(y, vec![Expr::int(2)])), "take(y,2)");
    assert_eq!(compile_expr(Expr::index(var("z", 1), vec![Expr::int(2)])), "z[2]");
}

#[test]
fn test_matrix_literals() {
    assert_eq!(compile_expr(Expr::empty_matrix()), "matlabarray([])");
    let m = Expr::Matrix(vec![
        vec![Expr::int(1), Expr::int(2)],
        vec![Expr::int(3), Expr::int(4)],
    ]);
    assert_eq!(compile_expr(m), "matlabarray([[1,2],[3,4]])");
    let s = Expr::Matrix(vec![vec![Expr::string("ab"), var("c", 0)]]);
    assert_eq!(compile_expr(s), "'ab' + c");
}

#[test]
fn test_member_access() {
    let s = || var("s", 0);
    assert_eq!(compile_expr(Expr::member(s(), Ident::new("f", 1))), "s.f");
    assert_eq!(
        compile_expr(Expr::dynamic_member(s(), var("k", 2))),
        "getattr(s,k)"
    );
}

#[test]
fn test_lambda_and_end() {
    let x = Ident::new("x", 0);
    let body = Expr::index(array("v", 1), vec![Expr::End]);
    assert_eq!(
        compile_expr(Expr::lambda(vec![x], body)),
        "lambda x: v[end()]"
    );
}

#[test]
fn test_delete_element() {
    let target = Expr::index(array("x", 0), vec![Expr::int(3)]);
    let code = compile_script(vec![Stmt::assign(target, Expr::empty_matrix(), 1)]);
    assert_eq!(code, "x = x.delete(3)\n");
}

#[test]
fn test_copy_on_assign() {
    let code = compile_script(vec![Stmt::assign(var("a", 0), var("b", 1), 1)]);
    assert_eq!(code, "a = copy(b)\n");
}

#[test]
fn test_write_once_wraps() {
    let w = Expr::ident(Ident::new("w", 0).with_property(Property::WriteOnce));
    let code = compile_script(vec![Stmt::assign(w, Expr::int(1), 1)]);
    assert_eq!(code, "w = matlabarray(1)\n");
}

#[test]
fn test_grow_on_first_write() {
    let target = Expr::index(Expr::ident(Ident::new("x", 0)), vec![Expr::int(1)]);
    let program = Program::new(vec![function(
        "fill",
        90,
        &[],
        vec![Stmt::assign(target, Expr::int(5), 2)],
    )]);
    let code = compile(&program, quiet()).unwrap();
    assert_eq!(
        code,
        "@function\n\
         def fill():\n    \
         globals().update(load_all_vars())\n    \
         try: x\n    \
         except NameError: x = matlabarray()\n    \
         x[1] = 5\n"
    );
}

#[test]
fn test_dynamic_field_store() {
    let target = Expr::dynamic_member(var("s", 0), var("k", 1));
    let code = compile_script(vec![Stmt::assign(target, Expr::int(1), 1)]);
    assert_eq!(code, "s = check_struct(s)\nsetattr(s,k,1)\n");
}

#[test]
fn test_struct_normalized_once_per_function() {
    let s = || var("s", 100);
    let body = vec![
        Stmt::assign(Expr::member(s(), Ident::new("f", 1)), var("v", 2), 1),
        Stmt::assign(Expr::member(s(), Ident::new("g", 3)), Expr::int(2), 2),
    ];
    let program = Program::new(vec![function("f", 91, &["s"], body)]);
    let code = compile(&program, quiet()).unwrap();
    assert_eq!(
        code,
        "@function\n\
         def f(s):\n    \
         globals().update(load_all_vars())\n    \
         s = check_struct(s)\n    \
         s.f = copy(v)\n    \
         s.g = copy(2)\n"
    );
    assert_eq!(code.matches("check_struct").count(), 1);
}

#[test]
fn test_struct_normalization_not_leaked() {
    let store = || {
        vec![Stmt::assign(
            Expr::member(var("s", 100), Ident::new("f", 1)),
            Expr::int(1),
            1,
        )]
    };
    let program = Program::new(vec![
        function("first", 92, &["s"], store()),
        function("second", 93, &["s"], store()),
    ]);
    let code = compile(&program, quiet()).unwrap();
    assert_eq!(
        code,
        "@function\n\
         def first(s):\n    \
         globals().update(load_all_vars())\n    \
         s = check_struct(s)\n    \
         s.f = copy(1)\n\n\
         @function\n\
         def second(s):\n    \
         globals().update(load_all_vars())\n    \
         s = check_struct(s)\n    \
         s.f = copy(1)\n"
    );
}

#[test]
fn test_shared_symbol_keeps_names() {
    let program = Program::new(vec![
        function("first", 7, &[], vec![Stmt::Pass]),
        function("second", 7, &[], vec![Stmt::Pass]),
    ]);
    let code = compile(&program, quiet()).unwrap();
    assert!(code.contains("def first():"));
    assert!(code.contains("def second():"));
}

#[test]
fn test_multi_target_records_members() {
    let targets = Expr::List(vec![
        Expr::member(var("s", 0), Ident::new("f", 1)),
        var("t", 2),
    ]);
    let value = Expr::call_nargout(var("g", 3), vec![], 2);
    let code = compile_script(vec![Stmt::assign(targets, value, 1)]);
    assert_eq!(code, "s = check_struct(s)\ns.f,t = g(nargout=2)\n");
}

#[test]
fn test_call_arity() {
    let f = || var("f", 0);
    let args = || vec![var("a", 1), var("b", 2)];
    assert_eq!(compile_expr(Expr::call(f(), vec![])), "f()");
    assert_eq!(compile_expr(Expr::call_nargout(f(), args(), 1)), "f(a,b)");
    assert_eq!(compile_expr(Expr::call_nargout(f(), vec![], 2)), "f(nargout=2)");
    assert_eq!(
        compile_expr(Expr::call_nargout(f(), args(), 2)),
        "f(a,b,nargout=2)"
    );
}

#[test]
fn test_eval_runs_in_caller_scope() {
    let eval = Expr::ident(Ident::new("eval", 0));
    let call = Expr::call(eval, vec![Expr::string("x = 1")]);
    assert_eq!(compile_expr(call), "exec_('x = 1',globals(),locals())");
}

#[test]
fn test_empty_function_body() {
    let program = Program::new(vec![function("g", 94, &[], vec![])]);
    let code = compile(&program, quiet()).unwrap();
    assert_eq!(
        code,
        "@function\ndef g():\n    globals().update(load_all_vars())\n    pass\n"
    );
}

#[test]
fn test_variadic_function() {
    let body = vec![Stmt::return_stmt(Some(Expr::ident(Ident::new("nargin", 5))))];
    let program = Program::new(vec![function("h", 95, &["a", "varargin"], body)]);
    let code = compile(&program, quiet()).unwrap();
    assert_eq!(
        code,
        "@function\n\
         def h(a,*varargin):\n    \
         globals().update(load_all_vars())\n    \
         nargin = len(varargin)\n    \
         return nargin\n"
    );
}

#[test]
fn test_empty_if_branch() {
    let code = compile_script(vec![Stmt::if_stmt(var("c", 0), vec![], None)]);
    assert_eq!(code, "if c:\n    pass\n");
}

#[test]
fn test_comment_only_branch_gets_pass() {
    let then_body = vec![Stmt::comment("% nothing yet")];
    let code = compile_script(vec![Stmt::if_stmt(var("c", 0), then_body, None)]);
    assert_eq!(code, "if c:\n    # nothing yet\n    pass\n");
}

#[test]
fn test_else_if_flattens() {
    let x = || var("x", 0);
    let program = script(vec![Stmt::if_stmt(
        var("a", 1),
        vec![Stmt::assign(x(), Expr::int(1), 2)],
        Some(Else::else_if(
            var("b", 2),
            vec![Stmt::assign(x(), Expr::int(2), 4)],
            Some(Else::Block(vec![Stmt::assign(x(), Expr::int(3), 6)])),
        )),
    )]);
    let before = program.clone();
    let code = compile(&program, quiet()).unwrap();
    assert_eq!(
        code,
        "if a:\n    x = 1\nelse:\n    if b:\n        x = 2\n    else:\n        x = 3\n"
    );
    assert_eq!(program, before);
}

#[test]
fn test_empty_else_omitted() {
    let code = compile_script(vec![Stmt::if_stmt(
        var("c", 0),
        vec![Stmt::Break],
        Some(Else::Block(vec![])),
    )]);
    assert_eq!(code, "if c:\n    break\n");
}

#[test]
fn test_for_iterates_columns() {
    let i = Ident::new("i", 0);
    let code = compile_script(vec![Stmt::for_loop(i.clone(), array("m", 1), vec![])]);
    assert_eq!(code, "for i in m.T:\n    pass\n");

    let product = Expr::binary(array("m", 1), BinaryOp::Mul, Expr::int(2));
    let code = compile_script(vec![Stmt::for_loop(i, product, vec![Stmt::Continue])]);
    assert_eq!(code, "for i in (m * 2).T:\n    continue\n");
}

#[test]
fn test_while_and_try() {
    let code = compile_script(vec![
        Stmt::while_loop(var("c", 0), vec![Stmt::expr(Expr::call(var("step", 1), vec![]))]),
        Stmt::try_stmt(vec![Stmt::Pass], vec![]),
    ]);
    assert_eq!(
        code,
        "while c:\n    step()\ntry:\n    pass\nfinally:\n    pass\n"
    );
}

#[test]
fn test_globals_and_return() {
    let names = vec![Ident::new("a", 0), Ident::new("b", 1)];
    let code = compile_script(vec![
        Stmt::Global(names.clone()),
        Stmt::Persistent(names),
        Stmt::return_stmt(None),
    ]);
    assert_eq!(code, "global a,b\nglobal a,b\nreturn\n");
}

#[test]
fn test_line_numbers() {
    let program = script(vec![Stmt::assign(var("x", 0), Expr::int(1), 7)]);
    let options = Options::default().with_filename("demo.m");
    let code = compile(&program, options).unwrap();
    assert_eq!(code, "x = 1\n# demo.m:7\n");
}

#[test]
fn test_line_numbers_nested() {
    let body = vec![Stmt::assign(var("x", 0), Expr::int(1), 3)];
    let program = script(vec![Stmt::while_loop(var("c", 1), body)]);
    let code = compile(&program, Options::default()).unwrap();
    assert_eq!(code, "while c:\n    x = 1\n    # <stdin>:3\n");
}

#[test]
fn test_declarations_joined() {
    let program = Program::new(vec![
        function("g", 99, &[], vec![Stmt::Pass]),
        Decl::Script(vec![Stmt::expr(Expr::call(var("g", 99), vec![]))]),
    ]);
    let code = compile(&program, quiet()).unwrap();
    assert_eq!(
        code,
        "@function\ndef g():\n    globals().update(load_all_vars())\n    pass\n\ng()\n"
    );
}

#[test]
fn test_idempotent() {
    let body = vec![
        Stmt::assign(Expr::member(var("s", 100), Ident::new("f", 1)), Expr::int(1), 1),
        Stmt::expr(Expr::ident(Ident::new("print", 2))),
    ];
    let program = Program::new(vec![function("f", 96, &["s"], body)]);
    let first = compile(&program, Options::default()).unwrap();
    let second = compile(&program, Options::default()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("print_"));
}

#[test]
fn test_range_arity_error() {
    let bad = Expr::index(array("x", 0), vec![Expr::Range(vec![Expr::int(1)])]);
    let decl = Decl::Script(vec![Stmt::expr(bad)]);

    let err = Backend::new(quiet()).compile_decl(&decl).unwrap_err();
    assert!(matches!(err, CompileError::InvalidArgCount { got: 1, .. }));

    let err = compile(&Program::new(vec![decl]), quiet()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Validation(ValidationError::InvalidArgCount { got: 1, .. })
    ));
}

#[test]
fn test_malformed_member() {
    let bad = Expr::Member {
        object: Box::new(var("s", 0)),
        field: Box::new(Expr::int(1)),
    };
    let decl = Decl::Script(vec![Stmt::expr(bad)]);
    let err = Backend::new(quiet()).compile_decl(&decl).unwrap_err();
    assert!(matches!(err, CompileError::Malformed(_)));
}

#[test]
fn test_misplaced_varargin() {
    let program = Program::new(vec![function("f", 97, &["varargin", "a"], vec![])]);
    let err = compile(&program, quiet()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'varargin' must be the last parameter of 'f'"
    );
}
