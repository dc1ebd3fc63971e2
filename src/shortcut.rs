/// Link that runs the named automation with the logged amount as its input.
pub fn shortcut_url(name: &str, amount: u64) -> String {
    format!(
        "shortcuts://run-shortcut?name={}&input={amount}",
        urlencoding::encode(name)
    )
}
