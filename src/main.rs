use std::{panic, process};

fn main() {
  let orig_hook = panic::take_hook();
  panic::set_hook(Box::new(move |panic_info| {
    orig_hook(panic_info);
    process::exit(1);
  }));

  if let Err(e) = ffburst_cli::run() {
    eprintln!("Error: {e:?}");
    process::exit(ffburst_cli::exit_code(&e));
  }
}
