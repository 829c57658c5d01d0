//! Connection resolver
//!
//! Joins connectors to lines and to each other. Every connection ends with
//! both sides attached to one shared outer line and an immediate resync, so
//! values already present on the net are visible without a wave.

use logicwire_core::{ConnectorId, KernelError, KernelResult, LineId};

use crate::{Circuit, Listener, Terminal};

impl Circuit {
    /// Connect a connector to a line or to another connector.
    ///
    /// Connecting two connectors is symmetric: whichever side already has an
    /// outer line donates it, otherwise a fresh line is created for both.
    pub fn connect(&mut self, connector: ConnectorId, target: impl Into<Terminal>) -> KernelResult<()> {
        let target = target.into();
        let (direction, outer) = {
            let this = self.connector(connector)?;
            (this.direction(), this.outer())
        };

        match target {
            Terminal::Line(line) => {
                self.line(line)?;
                if outer.is_some() {
                    return Err(KernelError::AlreadyConnected(connector));
                }
                self.attach(connector, line)
            }
            Terminal::Connector(other) => {
                let (other_direction, other_outer) = {
                    let that = self.connector(other)?;
                    (that.direction(), that.outer())
                };
                if direction == other_direction {
                    return Err(KernelError::IncompatibleDirection { direction });
                }

                match (outer, other_outer) {
                    (Some(_), None) => self.connect(other, Terminal::Connector(connector)),
                    (None, Some(line)) => self.attach(connector, line),
                    (None, None) => {
                        let line = self.new_line();
                        self.connect(other, Terminal::Line(line))?;
                        self.attach(connector, line)
                    }
                    (Some(_), Some(_)) => Err(KernelError::AlreadyConnected(connector)),
                }
            }
        }
    }

    /// Join several connectors onto one fresh line
    pub fn join(&mut self, connectors: &[ConnectorId]) -> KernelResult<LineId> {
        let line = self.new_line();
        for &connector in connectors {
            self.connect(connector, Terminal::Line(line))?;
        }
        Ok(line)
    }

    fn attach(&mut self, connector: ConnectorId, line: LineId) -> KernelResult<()> {
        let is_input = {
            let c = self.connector_mut(connector)?;
            c.set_outer(line);
            c.is_input()
        };
        if is_input {
            self.subscribe(line, Listener::Connector(connector))?;
        }
        tracing::debug!(connector = %connector, line = %line, "connector attached");

        self.resync(connector);
        Ok(())
    }
}
