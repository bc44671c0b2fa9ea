extern crate clap;
extern crate quill;

mod commands;
mod tessellate;

use clap::*;
use commands::*;
use quill::extra::parser::parse_path;
use quill::path::FillId;
use quill::tessellation::{FillOptions, FillRule};

use std::fs::File;
use std::io::prelude::*;
use std::io::{stderr, stdout, Write};
use std::process;

fn main() {
    env_logger::init();

    let matches = App::new("quill command-line interface")
        .version("0.3")
        .author("The quill developers")
        .about("Curve-preserving fill tessellator")
        .subcommand(
            SubCommand::with_name("tessellate")
                .about("Tessellates the fill regions of a path")
                .arg(
                    Arg::with_name("FILL")
                        .short("f")
                        .long("fill")
                        .help("The fill region to tessellate (1 by default)")
                        .value_name("FILL")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("ALL")
                        .long("all")
                        .help("Tessellates every fill region of the path")
                        .conflicts_with("FILL"),
                )
                .arg(
                    Arg::with_name("EVEN_ODD")
                        .long("even-odd")
                        .help("Uses the even-odd fill rule instead of the fill styles"),
                )
                .arg(
                    Arg::with_name("TOLERANCE")
                        .short("t")
                        .long("tolerance")
                        .help("Distance under which a control point is considered on its chord (0.1 by default)")
                        .value_name("TOLERANCE")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("COUNT")
                        .short("c")
                        .long("count")
                        .help("Prints the number of triangles of each kind"),
                ),
        )
        .arg(
            Arg::with_name("PATH")
                .value_name("PATH")
                .help("A path, for example \"F 1 0 M 0 0 L 1 0 Q 1 1 0 1 Z\"")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use")
                .short("i")
                .long("input")
                .value_name("FILE")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Sets the output file to use")
                .value_name("FILE")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false),
        )
        .get_matches();

    let mut input_buffer = matches.value_of("PATH").unwrap_or("").to_string();

    if let Some(input_file) = matches.value_of("INPUT") {
        let read = File::open(input_file).and_then(|mut file| file.read_to_string(&mut input_buffer));
        if let Err(e) = read {
            fail(&format!("Cannot read file {}: {}", input_file, e));
        }
    }

    let mut output: Box<dyn Write> = Box::new(stdout());

    if let Some(output_file) = matches.value_of("OUTPUT") {
        match File::create(output_file) {
            Ok(file) => {
                output = Box::new(file);
            }
            Err(e) => fail(&format!("Cannot create file {}: {}", output_file, e)),
        }
    }

    let path = match parse_path(&input_buffer) {
        Ok(path) => path,
        Err(e) => fail(&format!("{}", e)),
    };

    if let Some(tess_matches) = matches.subcommand_matches("tessellate") {
        let fills = if tess_matches.is_present("ALL") {
            FillSelection::All
        } else {
            FillSelection::One(get_fill(tess_matches))
        };

        let mut options = FillOptions::default().with_flatness_tolerance(get_tolerance(tess_matches));
        if tess_matches.is_present("EVEN_ODD") {
            options = options.with_fill_rule(FillRule::EvenOdd);
        }

        let cmd = TessellateCmd {
            path,
            fills,
            options,
            count: tess_matches.is_present("COUNT"),
            output,
        };

        if let Err(e) = tessellate::tessellate(cmd) {
            fail(&format!("{}", e));
        }
    }
}

fn fail(msg: &str) -> ! {
    let _ = writeln!(&mut stderr(), "{}", msg);
    process::exit(1);
}

fn get_fill(matches: &ArgMatches) -> FillId {
    match matches.value_of("FILL") {
        Some(fill_str) => match fill_str.parse() {
            Ok(id) => FillId(id),
            Err(_) => fail(&format!("Invalid fill id {:?}", fill_str)),
        },
        None => FillId(1),
    }
}

fn get_tolerance(matches: &ArgMatches) -> f32 {
    let default = FillOptions::DEFAULT_FLATNESS_TOLERANCE;
    if let Some(tolerance_str) = matches.value_of("TOLERANCE") {
        return tolerance_str.parse().unwrap_or(default);
    }

    default
}
