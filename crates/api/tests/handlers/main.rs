mod test_utils;

mod availability_test;
mod services_test;
