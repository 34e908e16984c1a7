mod test_local_candidates;
mod test_teardown;
