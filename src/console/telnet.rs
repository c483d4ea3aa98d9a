// ABOUTME: Minimal telnet option handling for the console socket.
// ABOUTME: Strips IAC sequences from the byte stream and refuses every option offered.

const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
const SB: u8 = 250;
const SE: u8 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Data,
    Iac,
    Option(u8),
    Subnegotiation,
    SubnegotiationIac,
}

/// Incremental decoder that separates console text from telnet negotiation.
///
/// State carries over between calls, so a sequence split across two reads is
/// still recognised.
#[derive(Debug, Default)]
pub struct TelnetDecoder {
    state: State,
}

/// Output of one decode step.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Plain console bytes.
    pub data: Vec<u8>,
    /// Negotiation replies that should be written back to the peer.
    pub replies: Vec<u8>,
}

impl TelnetDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, input: &[u8]) -> Decoded {
        let mut out = Decoded::default();

        for &byte in input {
            self.state = match (self.state, byte) {
                (State::Data, IAC) => State::Iac,
                (State::Data, b) => {
                    out.data.push(b);
                    State::Data
                }
                // Escaped 0xFF data byte
                (State::Iac, IAC) => {
                    out.data.push(IAC);
                    State::Data
                }
                (State::Iac, verb @ (WILL | WONT | DO | DONT)) => State::Option(verb),
                (State::Iac, SB) => State::Subnegotiation,
                (State::Iac, _) => State::Data,
                (State::Option(verb), option) => {
                    match verb {
                        WILL => out.replies.extend_from_slice(&[IAC, DONT, option]),
                        DO => out.replies.extend_from_slice(&[IAC, WONT, option]),
                        _ => {}
                    }
                    State::Data
                }
                (State::Subnegotiation, IAC) => State::SubnegotiationIac,
                (State::Subnegotiation, _) => State::Subnegotiation,
                (State::SubnegotiationIac, SE) => State::Data,
                (State::SubnegotiationIac, _) => State::Subnegotiation,
            };
        }

        out
    }
}
