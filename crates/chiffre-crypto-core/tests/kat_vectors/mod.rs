mod key_envelopes;
mod password_envelopes;
