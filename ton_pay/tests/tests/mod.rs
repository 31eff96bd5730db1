mod test_payment_flow;
mod test_toncenter_resolver;
mod utils;
