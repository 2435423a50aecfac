use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

use glossline::error::Error;
use glossline::pipeline::{Convert, Pipeline};

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Glossline::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Glossline::Convert(c) => {
            let pipeline = Convert::new(c.raw, c.dst, c.inventory);
            pipeline.run()?;
        }
    };
    Ok(())
}
