//! Literal in-source program images for the bundled demos. A real host
//! would get these from the bytecode loader (out of scope for the core);
//! here they stand in for it.

use c0vm::opcode::op;
use c0vm::{FunctionInfo, NativeInfo, NativeTable, ProgramImage, Value};

pub fn constant() -> (ProgramImage, NativeTable) {
    let image = single_function(vec![op::BIPUSH, 0x2A, op::RETURN], 0);
    (image, NativeTable::new())
}

pub fn arithmetic() -> (ProgramImage, NativeTable) {
    let image = single_function(
        vec![op::BIPUSH, 6, op::BIPUSH, 7, op::IMUL, op::RETURN],
        0,
    );
    (image, NativeTable::new())
}

pub fn function_call() -> (ProgramImage, NativeTable) {
    let callee = FunctionInfo {
        code: vec![op::VLOAD, 0, op::VLOAD, 1, op::IADD, op::RETURN],
        num_args: 2,
        num_vars: 2,
    };
    let caller = FunctionInfo {
        code: vec![
            op::BIPUSH, 3, op::BIPUSH, 4, op::INVOKESTATIC, 0x00, 0x01, op::RETURN,
        ],
        num_args: 0,
        num_vars: 0,
    };
    let image = ProgramImage {
        function_pool: vec![caller, callee],
        ..ProgramImage::default()
    };
    (image, NativeTable::new())
}

pub fn array_sum() -> (ProgramImage, NativeTable) {
    let mut code = vec![op::BIPUSH, 3, op::NEWARRAY, 4, op::VSTORE, 0];
    for (k, value) in [(0, 10), (1, 20), (2, 30)] {
        code.extend_from_slice(&[op::BIPUSH, k]);
        code.extend_from_slice(&[op::VLOAD, 0]);
        code.push(op::SWAP);
        code.push(op::AADDS);
        code.extend_from_slice(&[op::BIPUSH, value]);
        code.push(op::IMSTORE);
    }
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
    let image = single_function(code, 1);
    (image, NativeTable::new())
}

pub fn assertion() -> (ProgramImage, NativeTable) {
    let mut image = single_function(
        vec![
            op::BIPUSH, 0, op::ALDC, 0x00, 0x00, op::ASSERT, op::BIPUSH, 1, op::RETURN,
        ],
        0,
    );
    image.string_pool = b"nope\0".to_vec();
    (image, NativeTable::new())
}

/// Exercises `INVOKENATIVE`: a host-registered subtraction primitive.
pub fn native_call() -> (ProgramImage, NativeTable) {
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
    (image, natives)
}

fn single_function(code: Vec<u8>, num_vars: u16) -> ProgramImage {
    ProgramImage {
        function_pool: vec![FunctionInfo {
            code,
            num_args: 0,
            num_vars,
        }],
        ..ProgramImage::default()
    }
}
