// Tests for the auto-accept poll loop
