use std::process::exit;

use log::error;

mod cmd_args;
mod workflow;

pub fn main()
{
    let cmd = cmd_args::create_cmd_args();
    let options = cmd.get_matches();

    cmd_args::setup_logger(&options);

    let result = workflow::run(&options);

    if let Err(reason) = result
    {
        println!();
        error!(" Could not complete workflow, reason {reason:?}");

        println!();
        exit(-1);
    }
}
