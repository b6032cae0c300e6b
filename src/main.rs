use clap::{arg,crate_version,Command};
use huffpress::fgk;
use std::time::Instant;

const RCH: &str = "unreachable was reached";

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::init();
    let long_help =
"Examples:
---------
Compress:      `huffpress compress -i my_expanded -o my_compressed`
Expand:        `huffpress expand -i my_compressed -o my_expanded`";

    let mut main_cmd = Command::new("huffpress")
        .about("Compress and expand with the FGK adaptive Huffman code")
        .after_long_help(long_help)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("compress")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("compress a file"));

    main_cmd = main_cmd.subcommand(Command::new("expand")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("expand a file"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let mut in_file = std::fs::File::open(path_in)
            .map_err(|e| { eprintln!("error opening {}: {}",path_in,e); e })?;
        let mut out_file = std::fs::File::create(path_out)
            .map_err(|e| { eprintln!("error opening {}: {}",path_out,e); e })?;
        let timer = Instant::now();
        let (in_size,out_size) = fgk::compress(&mut in_file,&mut out_file)?;
        eprintln!("{} ({}) -> {} ({})",path_in,in_size,path_out,out_size);
        if in_size > 0 {
            let ratio = (in_size as f64 - out_size as f64) / in_size as f64 * 100.0;
            eprintln!("compression ratio {:.2} % in {:.2} secs",ratio,timer.elapsed().as_secs_f64());
        }
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let mut in_file = std::fs::File::open(path_in)
            .map_err(|e| { eprintln!("error opening {}: {}",path_in,e); e })?;
        let mut out_file = std::fs::File::create(path_out)
            .map_err(|e| { eprintln!("error opening {}: {}",path_out,e); e })?;
        let timer = Instant::now();
        let (in_size,out_size) = fgk::expand(&mut in_file,&mut out_file)?;
        eprintln!("{} ({}) -> {} ({})",path_in,in_size,path_out,out_size);
        eprintln!("expanded in {:.2} secs",timer.elapsed().as_secs_f64());
    }

    Ok(())
}
