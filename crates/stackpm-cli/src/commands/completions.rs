use super::EXIT_SUCCESS;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

pub fn run<C: CommandFactory>(shell: Shell, out: &mut dyn Write) -> Result<u8, String> {
    let mut cmd = C::command();
    let bin = cmd.get_name().to_owned();
    clap_complete::generate(shell, &mut cmd, bin, &mut *out);
    out.flush()
        .map_err(|e| format!("failed to write completions: {e}"))?;
    Ok(EXIT_SUCCESS)
}
