use std::fs;
use std::io::{self, Read};

use clap::{Parser, Subcommand};

use tinyscript::error::CompileError;
use tinyscript::parser::{self, lexer};

#[derive(Parser)]
#[command(name = "tinyscript")]
#[command(about = "Tokenizer and parser for a small scripting language", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Вывести поток токенов
    Tokens {
        /// Файл с исходником или `-` для stdin
        input: String,
    },

    /// Разобрать и вывести каждую инструкцию верхнего уровня
    Parse {
        /// Файл с исходником или `-` для stdin
        input: String,

        /// Вывести ещё и всё дерево
        #[arg(long)]
        show_ast: bool,
    },
}

fn read_source(input: &str) -> Result<String, CompileError> {
    if input == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokens { input } => {
            let source = read_source(&input)?;

            for token in lexer::tokenize(&source) {
                println!("{}\t{}\t{}", token.span, token.kind, token.literal);
            }
        }
        Commands::Parse { input, show_ast } => {
            let source = read_source(&input)?;
            let (program, errors) = parser::parse(&source);

            for statement in &program.statements {
                println!("{}", statement);
            }

            if show_ast {
                println!("=== AST ===");
                println!("{:#?}", program);
            }

            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("{}: {}", error.span(), error);
                }
                return Err(CompileError::SyntaxErrors {
                    input,
                    count: errors.len(),
                }
                .into());
            }
        }
    }

    Ok(())
}
