mod common;
use common::compile;

#[test]
fn int_assignment_is_bare() {
    let out = compile("int i = 42;\ni = 101;");
    assert_eq!(
        out.trim(),
        "#!/bin/bash\n\
         # Generated by the tyshc compiler. Do not edit.\n\
         \n\
         ### user script ###\n\
         i=42\n\
         i=101"
    );
}

#[test]
fn comparison_in_value_position_is_reified() {
    let out = compile("bool b = 42 > 13;");
    assert_eq!(
        out.trim(),
        "#!/bin/bash\n\
         # Generated by the tyshc compiler. Do not edit.\n\
         \n\
         ### user script ###\n\
         if [[ 42 -gt 13 ]]; then\n\
         \x20 tmpBool=\"true\"\n\
         else\n\
         \x20 tmpBool=\"false\"\n\
         fi\n\
         b=\"${tmpBool}\""
    );
}

#[test]
fn function_return_goes_through_int_register() {
    let out = compile("func add(int a, int b) int { return a + b; } int sum = add(1, 2);");
    assert_eq!(
        out.trim(),
        "#!/bin/bash\n\
         # Generated by the tyshc compiler. Do not edit.\n\
         \n\
         tmpIntIndex=0\n\
         \n\
         ### user script ###\n\
         \n\
         # add(int a, int b) int\n\
         add() {\n\
         \x20 local a=\"${1}\"\n\
         \x20 local b=\"${2}\"\n\
         \x20 tmpInts[${tmpIntIndex}]=$((a + b))\n\
         \x20 tmpIntIndex=$((tmpIntIndex + 1))\n\
         \x20 return\n\
         }\n\
         add 1 2\n\
         sum=${tmpInts[0]}"
    );
}

#[test]
fn compilation_is_deterministic() {
    let src = "func f() str { return \"x\"; }\nstr a = f();\nstr b = f();\nprintLn(a + b);";
    assert_eq!(compile(src), compile(src));
}

#[test]
fn natives_are_materialized_once() {
    let out = compile("printLn(\"a\");\nprintLn(\"b\");\nprintLn(\"c\");");
    assert_eq!(out.matches("printLn() {").count(), 1);
    assert!(out.contains("### native functions ###"));
}

#[test]
fn register_indices_advance_per_call_site() {
    let out = compile(
        "func one() int { return 1; }\n\
         int a = one();\n\
         int b = one();\n\
         one();\n\
         int c = one();",
    );
    assert!(out.contains("a=${tmpInts[0]}"));
    assert!(out.contains("b=${tmpInts[1]}"));
    // The discarded call still consumes index 2.
    assert!(out.contains("c=${tmpInts[3]}"));
}

#[test]
fn str_and_bool_variables_are_quoted() {
    let out = compile("str s = \"x\";\nbool b = true;\nint i = 1;\nstr t = s;\nbool c = b;\nint j = i;");
    assert!(out.contains("t=\"${s}\""));
    assert!(out.contains("c=\"${b}\""));
    assert!(out.contains("j=${i}"));
}

#[test]
fn string_comparison_uses_literal_operators() {
    let out = compile("str s = \"a\";\nif s == \"a\" { printLn(\"eq\"); }");
    assert!(out.contains("if [[ \"${s}\" == \"a\" ]]; then"));
}

#[test]
fn comments_carry_through() {
    let out = compile("// configuration\nint port = 80;");
    assert!(out.contains("# configuration\nport=80"));
}

#[test]
fn empty_blocks_get_a_placeholder() {
    let out = compile("if true { }");
    assert!(out.contains("if [[ \"true\" == \"true\" ]]; then\n  :\nfi"));
}

#[test]
fn comment_only_blocks_keep_the_placeholder() {
    let out = compile("if true {\n  // nothing yet\n}");
    assert!(
        out.contains("if [[ \"true\" == \"true\" ]]; then\n  # nothing yet\n  :\nfi"),
        "{}",
        out
    );
    let out = compile("func todo() void {\n  // later\n}");
    assert!(out.contains("todo() {\n  # later\n  :\n}"), "{}", out);
}

#[test]
fn reified_comparison_operands_get_their_own_slots() {
    let out = compile("bool b = (1 < 2) == (2 < 1);");
    // The left operand moves out of tmpBool before the right one lands there.
    assert!(out.contains("tmpBools[${tmpBoolIndex}]=\"${tmpBool}\""), "{}", out);
    assert!(
        out.contains("if [[ \"${tmpBools[0]}\" == \"${tmpBool}\" ]]; then"),
        "{}",
        out
    );
}

#[test]
fn else_if_chain_becomes_elif() {
    let out = compile(
        "int i = 2;\n\
         if i == 1 { printLn(\"one\"); } else if i == 2 { printLn(\"two\"); } else { printLn(\"many\"); }",
    );
    assert!(out.contains("elif [[ ${i} -eq 2 ]]; then"));
    assert!(out.contains("else\n"));
    assert!(out.contains("fi\n"));
}

#[test]
fn else_if_call_preludes_run_in_source_order() {
    let out = compile(
        "func first() bool { return 1 < 2; }\n\
         func second() bool { return 2 < 1; }\n\
         int i = 3;\n\
         if i == 1 { printLn(\"a\"); } else if first() { printLn(\"b\"); } else if second() { printLn(\"c\"); }",
    );
    let first_call = out.find("\nfirst\n").unwrap();
    let second_call = out.find("\nsecond\n").unwrap();
    let chain = out.find("if [[ ${i} -eq 1 ]]; then").unwrap();
    assert!(first_call < second_call, "{}", out);
    assert!(second_call < chain, "{}", out);
    assert!(out.contains("elif [[ \"${tmpBools[0]}\" == \"true\" ]]; then"), "{}", out);
    assert!(out.contains("elif [[ \"${tmpBools[1]}\" == \"true\" ]]; then"), "{}", out);
}

#[test]
fn while_loop_emits_do_done() {
    let out = compile("int i = 0;\nwhile i < 3 { i = i + 1; }");
    assert!(out.contains("while [[ ${i} -lt 3 ]]; do"));
    assert!(out.contains("i=$((i + 1))"));
    assert!(out.contains("done"));
}

#[test]
fn string_concat_is_juxtaposition() {
    let out = compile("str s = \"foo\" + \"bar\";");
    assert!(out.contains("s=\"foo\"\"bar\""));
}

#[test]
fn object_declaration_uses_associative_array() {
    let out = compile("obj p = { x: 1, y: \"up\" };\np.x = 2;");
    assert!(out.contains("declare -A p"));
    assert!(out.contains("p[x]=1"));
    assert!(out.contains("p[y]=\"up\""));
    assert!(out.contains("p[x]=2"));
}

#[test]
fn logical_operators_join_inside_one_test() {
    let out = compile("int i = 5;\nif i > 1 && i < 9 { printLn(\"mid\"); }");
    assert!(out.contains("if [[ ${i} -gt 1 && ${i} -lt 9 ]]; then"));
}

#[test]
fn register_counters_initialized_only_when_used() {
    let out = compile("int i = 1;");
    assert!(!out.contains("tmpIntIndex=0"));
    let out = compile("int n = strToInt(\"4\");");
    assert!(out.contains("tmpIntIndex=0"));
    assert!(!out.contains("tmpStrIndex=0"));
}
