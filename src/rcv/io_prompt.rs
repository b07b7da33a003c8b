// Reading the rankings one line at a time, as typed by the operator.

use std::io::{BufRead, Write};

use crate::rcv::*;

pub struct PromptReader<R: BufRead, W: Write> {
    input: R,
    output: W,
    show_prompts: bool,
}

impl<R: BufRead, W: Write> PromptReader<R, W> {
    pub fn new(input: R, output: W, show_prompts: bool) -> PromptReader<R, W> {
        PromptReader {
            input,
            output,
            show_prompts,
        }
    }

    fn prompt(&mut self, text: &str) -> RcvResult<()> {
        if self.show_prompts {
            write!(self.output, "{}", text).context(ReadingInputSnafu {})?;
            self.output.flush().context(ReadingInputSnafu {})?;
        }
        Ok(())
    }

    // The line without its terminator. Spaces are part of the name.
    fn read_line(&mut self) -> RcvResult<String> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context(ReadingInputSnafu {})?;
        ensure!(n > 0, EndOfInputSnafu {});
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Asks for the number of voters until a non-negative integer is entered.
    pub fn read_voter_count(&mut self) -> RcvResult<u32> {
        loop {
            self.prompt("Number of voters: ")?;
            let line = self.read_line()?;
            match line.trim().parse::<u32>() {
                Result::Ok(x) => return Ok(x),
                Result::Err(_) => debug!("read_voter_count: not a number: {:?}", line),
            }
        }
    }

    /// Reads the ranking of one voter, one name per rank.
    ///
    /// Every name goes through `check` as soon as it is read, so that an unknown name
    /// stops the input right away.
    pub fn read_ranking<F>(&mut self, num_candidates: usize, check: F) -> RcvResult<Vec<String>>
    where
        F: Fn(usize, &str) -> RcvResult<()>,
    {
        let mut ranks: Vec<String> = Vec::with_capacity(num_candidates);
        for rank in 1..=num_candidates {
            self.prompt(&format!("Rank {}: ", rank))?;
            let name = self.read_line()?;
            check(rank, &name)?;
            ranks.push(name);
        }
        if self.show_prompts {
            writeln!(self.output).context(ReadingInputSnafu {})?;
        }
        Ok(ranks)
    }
}
