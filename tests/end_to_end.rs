use c0vm::opcode::op;
use c0vm::{execute, FunctionInfo, NativeInfo, NativeTable, ProgramImage, Trap, Value};

fn program(code: Vec<u8>, num_vars: u16) -> ProgramImage {
    ProgramImage {
        function_pool: vec![FunctionInfo {
            code,
            num_args: 0,
            num_vars,
        }],
        ..ProgramImage::default()
    }
}

fn run(image: &ProgramImage) -> Result<i32, Trap> {
    execute(image, &NativeTable::new())
}

#[test]
fn entry_returning_a_constant() {
    let image = program(vec![op::BIPUSH, 0x2A, op::RETURN], 0);
    assert_eq!(run(&image).unwrap(), 42);
}

#[test]
fn arithmetic() {
    let image = program(
        vec![op::BIPUSH, 6, op::BIPUSH, 7, op::IMUL, op::RETURN],
        0,
    );
    assert_eq!(run(&image).unwrap(), 42);
}

#[test]
fn branch_taken() {
    let image = program(
        vec![
            op::BIPUSH,
            1,
            op::BIPUSH,
            1,
            op::IF_CMPEQ,
            0x00,
            0x06,
            op::BIPUSH,
            0,
            op::RETURN,
            op::BIPUSH,
            99,
            op::RETURN,
        ],
        0,
    );
    assert_eq!(run(&image).unwrap(), 99);
}

#[test]
fn branch_not_taken() {
    let image = program(
        vec![
            op::BIPUSH,
            1,
            op::BIPUSH,
            2,
            op::IF_CMPEQ,
            0x00,
            0x06,
            op::BIPUSH,
            0,
            op::RETURN,
            op::BIPUSH,
            99,
            op::RETURN,
        ],
        0,
    );
    assert_eq!(run(&image).unwrap(), 0);
}

#[test]
fn function_call() {
    let callee = FunctionInfo {
        code: vec![op::VLOAD, 0, op::VLOAD, 1, op::IADD, op::RETURN],
        num_args: 2,
        num_vars: 2,
    };
    let caller = FunctionInfo {
        code: vec![
            op::BIPUSH,
            3,
            op::BIPUSH,
            4,
            op::INVOKESTATIC,
            0x00,
            0x01,
            op::RETURN,
        ],
        num_args: 0,
        num_vars: 0,
    };
    let image = ProgramImage {
        function_pool: vec![caller, callee],
        ..ProgramImage::default()
    };
    assert_eq!(run(&image).unwrap(), 7);
}

#[test]
fn array_round_trip_and_out_of_bounds_traps() {
    // locals: 0 = array ref
    let mut code = vec![
        op::BIPUSH, 3, // n = 3
        op::NEWARRAY, 4, // stride 4
        op::VSTORE, 0, // arr = ...
    ];
    for (k, value) in [(0, 10), (1, 20), (2, 30)] {
        code.extend_from_slice(&[op::BIPUSH, k]);
        code.extend_from_slice(&[op::VLOAD, 0]);
        code.push(op::SWAP);
        code.push(op::AADDS);
        code.extend_from_slice(&[op::BIPUSH, value]);
        code.push(op::IMSTORE);
    }
    // sum = arr[0] + arr[1] + arr[2]
    code.extend_from_slice(&[op::BIPUSH, 0]);
    code.extend_from_slice(&[op::VLOAD, 0]);
    code.push(op::SWAP);
    code.push(op::AADDS);
    code.push(op::IMLOAD);
    for k in 1..3 {
        code.extend_from_slice(&[op::BIPUSH, k]);
        code.extend_from_slice(&[op::VLOAD, 0]);
        code.push(op::SWAP);
        code.push(op::AADDS);
        code.push(op::IMLOAD);
        code.push(op::IADD);
    }
    code.push(op::RETURN);
    let image = program(code, 1);
    assert_eq!(run(&image).unwrap(), 60);

    let oob = program(
        vec![
            op::BIPUSH, 3, // index
            op::BIPUSH, 3, // n
            op::NEWARRAY, 4,
            op::SWAP,
            op::AADDS,
            op::IMLOAD,
            op::RETURN,
        ],
        0,
    );
    assert!(matches!(run(&oob).unwrap_err(), Trap::Memory(_)));
}

#[test]
fn assertion_failure() {
    let mut image = program(
        vec![op::BIPUSH, 0, op::ALDC, 0x00, 0x00, op::ASSERT, op::BIPUSH, 1, op::RETURN],
        0,
    );
    image.string_pool = b"nope\0".to_vec();
    let err = run(&image).unwrap_err();
    assert_eq!(err.exit_code(), c0vm::definitions::exit_code::ASSERTION);
    match err {
        Trap::Assertion(message) => assert_eq!(message, "nope"),
        other => panic!("expected assertion failure, got {other:?}"),
    }
}

#[test]
fn user_error_via_athrow() {
    let mut image = program(
        vec![op::ALDC, 0x00, 0x00, op::ATHROW],
        0,
    );
    image.string_pool = b"boom\0".to_vec();
    match run(&image).unwrap_err() {
        Trap::User(message) => assert_eq!(message, "boom"),
        other => panic!("expected user error, got {other:?}"),
    }
}

#[test]
fn idiv_by_zero_traps_arithmetic() {
    let image = program(
        vec![op::BIPUSH, 1, op::BIPUSH, 0, op::IDIV, op::RETURN],
        0,
    );
    assert!(matches!(run(&image).unwrap_err(), Trap::Arithmetic(_)));
}

#[test]
fn idiv_int_min_by_minus_one_traps_arithmetic() {
    let mut code = vec![op::ILDC, 0x00, 0x00, op::BIPUSH];
    code.push((-1i32) as u8);
    code.push(op::IDIV);
    code.push(op::RETURN);
    let image = ProgramImage {
        function_pool: vec![FunctionInfo {
            code,
            num_args: 0,
            num_vars: 0,
        }],
        int_pool: vec![i32::MIN],
        ..ProgramImage::default()
    };
    assert!(matches!(run(&image).unwrap_err(), Trap::Arithmetic(_)));
}

#[test]
fn shift_out_of_range_traps_arithmetic() {
    let shl_32 = program(
        vec![op::BIPUSH, 1, op::BIPUSH, 32, op::ISHL, op::RETURN],
        0,
    );
    assert!(matches!(run(&shl_32).unwrap_err(), Trap::Arithmetic(_)));

    let mut code = vec![op::BIPUSH, 1, op::BIPUSH];
    code.push((-1i32) as u8);
    code.push(op::ISHR);
    code.push(op::RETURN);
    let shr_neg1 = program(code, 0);
    assert!(matches!(run(&shr_neg1).unwrap_err(), Trap::Arithmetic(_)));
}

#[test]
fn imload_on_null_traps_memory() {
    let image = program(vec![op::ACONST_NULL, op::IMLOAD, op::RETURN], 0);
    assert!(matches!(run(&image).unwrap_err(), Trap::Memory(_)));
}

#[test]
fn newarray_negative_size_traps_memory() {
    let mut code = vec![op::BIPUSH];
    code.push((-1i32) as u8);
    code.push(op::NEWARRAY);
    code.push(4);
    code.push(op::RETURN);
    let image = program(code, 0);
    assert!(matches!(run(&image).unwrap_err(), Trap::Memory(_)));
}

#[test]
fn dup_then_pop_is_identity() {
    let image = program(
        vec![op::BIPUSH, 42, op::DUP, op::POP, op::RETURN],
        0,
    );
    assert_eq!(run(&image).unwrap(), 42);
}

#[test]
fn swap_twice_is_identity() {
    let image = program(
        vec![
            op::BIPUSH, 1, op::BIPUSH, 2, op::SWAP, op::SWAP, op::POP, op::RETURN,
        ],
        0,
    );
    assert_eq!(run(&image).unwrap(), 1);
}

#[test]
fn vstore_vload_round_trip() {
    let image = program(
        vec![op::BIPUSH, 7, op::VSTORE, 0, op::VLOAD, 0, op::RETURN],
        1,
    );
    assert_eq!(run(&image).unwrap(), 7);
}

#[test]
fn new_cell_reads_as_zero() {
    let image = program(
        vec![op::NEW, 4, op::IMLOAD, op::RETURN],
        0,
    );
    assert_eq!(run(&image).unwrap(), 0);
}

#[test]
fn native_call_is_invoked_with_reversed_argument_order() {
    let image = ProgramImage {
        function_pool: vec![FunctionInfo {
            code: vec![
                op::BIPUSH, 10, op::BIPUSH, 3, op::INVOKENATIVE, 0x00, 0x00, op::RETURN,
            ],
            num_args: 0,
            num_vars: 0,
        }],
        native_pool: vec![NativeInfo {
            num_args: 2,
            function_table_index: 0,
        }],
        ..ProgramImage::default()
    };
    let mut natives = NativeTable::new();
    natives.register(|args: &[Value]| Ok(Value::Int(args[0].int_of() - args[1].int_of())));
    assert_eq!(execute(&image, &natives).unwrap(), 7);
}
