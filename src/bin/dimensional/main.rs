/*

main.rs - Dimensional REPL
Copyright (C) 2022  Kian Kasad

This file is part of Dimensional.

Dimensional is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, version 3 of the License.

Dimensional is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Dimensional.  If not, see <https://www.gnu.org/licenses/>.

*/

mod completion;

use dimensional::{resolver::UnitResolver, runtime::Runtime};
use rustyline::{error::ReadlineError, CompletionType, Editor};
use tracing_subscriber::EnvFilter;

use self::textio::*;
use crate::completion::UnitCompleter;

mod textio {
    pub const PROMPT: &str = "> ";

    #[cfg(feature = "debug")]
    pub const COLOR_DBG: &str = "\x1b[1;34m";

    pub const COLOR_ERR: &str = "\x1b[1;31m";
    pub const COLOR_WARN: &str = "\x1b[1;33m";
    pub const COLOR_RST: &str = "\x1b[m";

    pub const STARTUP_MESSAGE: &str = concat!(
        "Dimensional ",
        env!("CARGO_PKG_VERSION"),
        "\n",
        "Copyright (C) 2022  Kian Kasad\n",
        "This program comes with ABSOLUTELY NO WARRANTY. This is free software,\n",
        "and you are welcome to redistribute it under certain conditions.\n",
        "Type `license' for details, `q' to quit.\n",
    );

    pub const LICENSE_MESSAGE: &str = concat!(
        "Dimensional is free software: you can redistribute it and/or modify\n",
        "it under the terms of the GNU General Public License as published by\n",
        "the Free Software Foundation, version 3 of the License.\n",
        "\n",
        "Dimensional is distributed in the hope that it will be useful,\n",
        "but WITHOUT ANY WARRANTY; without even the implied warranty of\n",
        "MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the\n",
        "GNU General Public License for more details.\n",
        "\n",
        "You should have received a copy of the GNU General Public License\n",
        "along with Dimensional.  If not, see <https://www.gnu.org/licenses/>.\n",
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let editor_config = rustyline::Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = match Editor::with_config(editor_config) {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!(
                "{}Error:{} failed to create line editor: {}",
                COLOR_ERR, COLOR_RST, err
            );
            return;
        }
    };

    let resolver = UnitResolver::standard();
    let mut rt = Runtime::with_resolver(resolver);

    // Create and register completion helper
    rl.set_helper(Some(UnitCompleter::new(resolver)));

    eprint!("{}", STARTUP_MESSAGE);

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line == "q" || line == "quit" || line == "exit" {
                    break;
                }

                rl.add_history_entry(line);

                if line == "license" {
                    print!("{}", LICENSE_MESSAGE);
                    continue;
                }

                // Ignore comments and blank lines
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                #[cfg(feature = "debug")]
                print_debug(line);

                match rt.evaluate(line) {
                    Ok(output) => println!("{}", rt.format(&output)),
                    Err(err) => eprintln!("{}Error:{} {}", COLOR_ERR, COLOR_RST, err),
                }
            }

            Err(ReadlineError::Eof) => {
                break;
            }

            Err(ReadlineError::Interrupted) => {
                eprintln!("{}Warning:{} process interrupted.", COLOR_WARN, COLOR_RST);
                break;
            }
            Err(e) => {
                println!("{}Error:{} {:?}", COLOR_ERR, COLOR_RST, e);
                break;
            }
        }
    }
}

/// Print the tokens and expression tree of every unit named on a line.
#[cfg(feature = "debug")]
fn print_debug(line: &str) {
    use dimensional::{
        lexer::{Lexer, Token},
        parser::Parser,
        runtime::Command,
    };

    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(_) => return,
    };
    eprintln!("{}Command:{} {:?}", COLOR_DBG, COLOR_RST, command);
    for unit in command.units() {
        let tokens: Vec<Token> = Lexer::new(unit).collect();
        eprintln!("{}Tokens:{} {:?}", COLOR_DBG, COLOR_RST, tokens);
        match Parser::new(unit).parse() {
            Ok(tree) => eprintln!("{}Tree:{} {:?}", COLOR_DBG, COLOR_RST, tree),
            Err(err) => eprintln!("{}Tree:{} {}", COLOR_DBG, COLOR_RST, err),
        }
    }
}
