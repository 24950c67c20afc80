fn main() -> std::process::ExitCode {
  cyclestrong_lib::run()
}
