use super::*;

#[test]
fn build_registers_every_opcode_exactly_once() {
    let registry = build();
    assert_eq!(registry.len(), 11);
}

#[test]
fn build_wires_auth_and_a_task_opcode_to_the_expected_handlers() {
    let registry = build();
    assert_eq!(registry[&opcodes::CMSG_AUTH_REQUEST] as usize, auth::handle as usize);
    assert_eq!(registry[&opcodes::CMSG_TASK_GET] as usize, task::handle_get as usize);
}

#[test]
#[should_panic(expected = "registered twice")]
fn insert_unique_panics_on_duplicate_opcode() {
    let mut registry = Registry::new();
    insert_unique(&mut registry, 1, auth::handle);
    insert_unique(&mut registry, 1, auth::handle);
}
