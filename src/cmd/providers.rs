use radioscout::StationFinder;

pub fn cmd_providers(finder: &StationFinder, long: bool) {
    for provider in finder.providers() {
        if long {
            println!(
                "{}\t{}\t{}",
                provider.name(),
                provider.id(),
                provider.base_url()
            );
        } else {
            println!("{}", provider.name());
        }
    }
}
