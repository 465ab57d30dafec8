use pretty_assertions::assert_eq;

use super::run;

const POINT: &str = "struct Point x:int y:int end\nstruct new Point p\n";

#[test]
fn new_instance_has_defaults() {
    assert_eq!(run(&format!("{POINT}struct dump p")), "Point { x: 0, y: 0 }");
}

#[test]
fn set_and_get_fields() {
    let script = format!("{POINT}struct set p x 3\nstruct get p x v\nprint v\nstruct dump p");
    assert_eq!(run(&script), "3\nPoint { x: 3, y: 0 }");
}

#[test]
fn field_keyword_form() {
    let script = "struct User field name str field score float end\n\
                  struct new User u\n\
                  struct set u name \"ada\"\n\
                  struct set u score 2\n\
                  struct dump u";
    assert_eq!(run(script), "User { name: \"ada\", score: 2.0 }");
}

#[test]
fn field_type_is_enforced() {
    assert_eq!(
        run(&format!("{POINT}struct set p x \"one\"")),
        "[Error: Type mismatch: expected int, got string]"
    );
}

#[test]
fn unknown_field_and_type() {
    assert_eq!(
        run(&format!("{POINT}struct get p z")),
        "[Error: 'Point' has no field 'z']"
    );
    assert_eq!(
        run("struct new Ghost g"),
        "[Error: Struct type 'Ghost' is not defined]"
    );
}

#[test]
fn unknown_field_type_in_declaration() {
    assert_eq!(
        run("struct Bad x:blob end"),
        "[Error: Unknown field type 'blob']"
    );
}
