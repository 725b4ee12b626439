use crate::devices::{self, DeviceType};
use std::io::{self, BufRead, Write};

/// Ask the operator whether to capture as a PC or a mobile device
pub fn choose_device_type<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<DeviceType> {
    let index = choose(input, output, "Choose the device type:", &["PC", "Mobile"])?;
    Ok(if index == 0 {
        DeviceType::Pc
    } else {
        DeviceType::Mobile
    })
}

/// Ask the operator which mobile device preset to emulate
pub fn choose_mobile_device<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    let names = devices::catalog();
    let index = choose(input, output, "Choose the mobile device:", &names)?;
    Ok(names[index].to_string())
}

/// Single-choice list. Accepts a 1-based number or the choice text.
fn choose<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
    choices: &[&str],
) -> io::Result<usize> {
    writeln!(output, "? {}", message)?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, choice)?;
    }

    loop {
        write!(output, "Answer [1-{}]: ", choices.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no answer given",
            ));
        }
        let answer = line.trim();

        let picked = match answer.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => Some(n - 1),
            _ => choices
                .iter()
                .position(|choice| choice.eq_ignore_ascii_case(answer)),
        };
        match picked {
            Some(index) => return Ok(index),
            None => writeln!(output, "Please pick one of the listed options.")?,
        }
    }
}
