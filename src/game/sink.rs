/// Receives every line the game writes to its log.
pub trait GameLog {
    fn log(&mut self, message: &str);
}

impl<F: FnMut(&str)> GameLog for F {
    fn log(&mut self, message: &str) {
        self(message)
    }
}

/// Forwards game log lines to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl GameLog for LogSink {
    fn log(&mut self, message: &str) {
        log::info!(target: "pandemic_rs::game", "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_collect_lines() {
        let mut lines = Vec::new();
        {
            let mut sink = |line: &str| lines.push(line.to_string());
            sink.log("first");
            GameLog::log(&mut sink, "second");
        }
        assert_eq!(lines, vec!["first", "second"]);
    }
}
