mod demos;

use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Demo {
    Constant,
    Arithmetic,
    FunctionCall,
    ArraySum,
    Assertion,
    NativeCall,
}

/// Runs one of the bundled demo programs on the c0vm core.
#[derive(Parser, Debug)]
struct Args {
    #[arg(value_enum)]
    demo: Option<Demo>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let Some(demo) = args.demo else {
        for name in Demo::value_variants() {
            println!("{}", name.to_possible_value().unwrap().get_name());
        }
        return;
    };

    let (image, natives) = match demo {
        Demo::Constant => demos::constant(),
        Demo::Arithmetic => demos::arithmetic(),
        Demo::FunctionCall => demos::function_call(),
        Demo::ArraySum => demos::array_sum(),
        Demo::Assertion => demos::assertion(),
        Demo::NativeCall => demos::native_call(),
    };

    match c0vm::execute(&image, &natives) {
        Ok(value) => {
            println!("{value}");
        }
        Err(trap) => {
            eprintln!("{trap}");
            std::process::exit(trap.exit_code());
        }
    }
}
