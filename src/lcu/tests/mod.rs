// Tests for lockfile discovery and the LCU client



#[cfg(test)]
mod test_accessors;
